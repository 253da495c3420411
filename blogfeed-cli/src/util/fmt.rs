use std::{fmt, time::Duration};

#[derive(Clone, Copy, Debug)]
pub struct FileSize(pub u64);

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const UNITS: [&str; 3] = ["B", "KB", "MB"];
        if self.0 < 1000 {
            return write!(f, "{}B", self.0);
        }
        let bytes = self.0 as f32;
        let i = ((bytes.log10() / 3.0) as usize).min(UNITS.len() - 1);

        write!(f, "{:.1}{}", bytes / 1000.0f32.powi(i as i32), UNITS[i])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs >= 60 {
            write!(f, "{}m {:02}s", secs / 60, secs % 60)
        } else {
            write!(f, "{}.{:02}s", secs, self.0.subsec_nanos() / 10_000_000)
        }
    }
}

/// `1 article`, `3 articles`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
