use std::{
    fmt,
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
};

use anstyle::*;

const CLEAR_LINE: &str = "\x1b[2K";

static SHELL: OnceLock<Shell> = OnceLock::new();

pub fn shell() -> &'static Shell {
    SHELL.get_or_init(Shell::new)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Error,
    Warn,
    Status,
    Progress,
}

impl Level {
    fn style(self) -> Style {
        match self {
            Self::Error => AnsiColor::Red.on_default().bold(),
            Self::Warn => AnsiColor::Yellow.on_default().bold(),
            Self::Status => AnsiColor::Green.on_default().bold(),
            Self::Progress => AnsiColor::Cyan.on_default().bold(),
        }
    }

    /// Status and progress lines are right-justified under a verb; diagnostics
    /// are prefixed with their kind.
    fn justified(self) -> bool {
        matches!(self, Self::Status | Self::Progress)
    }

    fn silenced_by_quiet(self) -> bool {
        matches!(self, Self::Status | Self::Progress)
    }
}

/// User-facing messages on stderr. Progress lines are overwritten by whatever
/// is printed next.
pub struct Shell {
    stderr: Mutex<(Box<dyn Write + Send>, bool)>,
    quiet: AtomicBool,
}

impl Shell {
    fn new() -> Self {
        Self::with_writer(anstream::stderr())
    }

    fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            stderr: Mutex::new((Box::new(writer), false)),
            quiet: AtomicBool::new(false),
        }
    }

    /// Erases a pending progress line, if any.
    pub fn clear_line(&self) {
        let mut guard = self.stderr.lock().unwrap_or_else(|err| err.into_inner());
        let (stderr, needs_clear) = &mut *guard;
        if *needs_clear {
            *needs_clear = false;
            let _ = write!(stderr, "\r{CLEAR_LINE}");
        }
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn print(&self, level: Level, label: impl fmt::Display, message: impl fmt::Display) {
        if level.silenced_by_quiet() && self.quiet.load(Ordering::Relaxed) {
            return;
        }

        let line = format_line(level, label, message);
        let mut buf = vec![];
        let mut guard = self.stderr.lock().unwrap_or_else(|err| err.into_inner());
        let (stderr, needs_clear) = &mut *guard;
        if *needs_clear {
            *needs_clear = false;
            write!(&mut buf, "{CLEAR_LINE}").unwrap();
        }
        if level == Level::Progress {
            *needs_clear = true;
            write!(&mut buf, "{line}\r").unwrap();
        } else {
            writeln!(&mut buf, "{line}").unwrap();
        }
        // nowhere left to report a failing stderr
        let _ = stderr.write_all(&buf);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.print(Level::Error, "error", message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.print(Level::Warn, "warning", message);
    }

    pub fn status(&self, status: impl fmt::Display, message: impl fmt::Display) {
        self.print(Level::Status, status, message);
    }

    pub fn progress(&self, status: impl fmt::Display, message: impl fmt::Display) {
        self.print(Level::Progress, status, message);
    }
}

fn format_line(level: Level, label: impl fmt::Display, message: impl fmt::Display) -> String {
    let style = level.style();
    if level.justified() {
        format!("{style}{label:>12}{style:#} {message}")
    } else {
        let bold = if style.get_effects().contains(Effects::BOLD) {
            Style::new().bold()
        } else {
            Style::new()
        };
        format!("{style}{label}{style:#}{bold}:{bold:#} {message}")
    }
}
