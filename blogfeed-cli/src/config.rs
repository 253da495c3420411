use std::{collections::BTreeSet, fs, time::Duration};

use anyhow::{ensure, Context, Result};
use blogfeed::{
    client::{HttpOptions, DEFAULT_BASE_URL},
    PostSource,
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::shell;

pub const FILE_NAME: &str = "blogfeed.toml";

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub posts: PostSource,
    pub render: Render,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: None,
            posts: PostSource::All,
            render: Render::default(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "kebab-case")]
pub struct Render {
    pub pretty: bool,
    pub users: bool,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            pretty: true,
            users: true,
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the first of `./blogfeed.toml` and
    /// `<config dir>/blogfeed/blogfeed.toml` that exists, otherwise defaults.
    pub fn discover(explicit: Option<&Utf8Path>) -> Result<(Self, Option<Utf8PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for path in candidates() {
            if path.is_file() {
                let config = Self::load(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("`{path}` is not a readable config file"))?;

        let (config, unused) =
            Self::parse(&contents).with_context(|| format!("invalid config file `{path}`"))?;
        for key in unused {
            shell().warn(format!("{path}: unused config key: {key}"));
        }
        Ok(config)
    }

    /// Parses and validates `contents`, also returning keys that were ignored.
    pub fn parse(contents: &str) -> Result<(Self, BTreeSet<String>)> {
        let mut unused = BTreeSet::new();
        let config: Self =
            serde_ignored::deserialize(toml::Deserializer::new(contents), |path| {
                unused.insert(path.to_string());
            })?;

        config.validate()?;
        Ok((config, unused))
    }

    pub fn http_options(&self) -> HttpOptions {
        let defaults = HttpOptions::default();
        HttpOptions {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.base_url.starts_with("http://") || self.base_url.starts_with("https://"),
            "base-url must be an http(s) URL, found `{}`",
            self.base_url
        );
        ensure!(self.timeout_secs > 0, "timeout-secs must be at least 1");
        Ok(())
    }
}

fn candidates() -> Vec<Utf8PathBuf> {
    let mut paths = vec![Utf8PathBuf::from(FILE_NAME)];
    if let Some(dir) = dirs::config_dir().and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()) {
        paths.push(dir.join("blogfeed").join(FILE_NAME));
    }
    paths
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blogfeed::{client::DEFAULT_BASE_URL, PostSource};
    use camino::Utf8Path;

    use super::Config;

    #[test]
    fn empty_file_is_all_defaults() {
        let (config, unused) = Config::parse("").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.posts, PostSource::All);
        assert!(config.render.pretty);
        assert!(config.render.users);
        assert!(unused.is_empty());
    }

    #[test]
    fn reads_every_key() {
        let (config, unused) = Config::parse(
            r#"
            base-url = "http://localhost:3000"
            timeout-secs = 5
            user-agent = "feed-test"
            posts = "per-user"

            [render]
            pretty = false
            users = false
            "#,
        )
        .unwrap();
        assert!(unused.is_empty());
        assert_eq!(config.posts, PostSource::PerUser);
        assert!(!config.render.pretty);
        assert!(!config.render.users);

        let options = config.http_options();
        assert_eq!(options.base_url, "http://localhost:3000");
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.user_agent, "feed-test");
    }

    #[test]
    fn reports_unknown_keys() {
        let (_, unused) = Config::parse(
            r#"
            base-url = "https://example.com"
            retries = 3

            [render]
            theme = "dark"
            "#,
        )
        .unwrap();
        assert_eq!(
            unused.into_iter().collect::<Vec<_>>(),
            ["render.theme", "retries"]
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::parse(r#"base-url = "ftp://example.com""#).is_err());
        assert!(Config::parse("timeout-secs = 0").is_err());
        assert!(Config::parse(r#"posts = "some""#).is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = Config::discover(Some(Utf8Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
