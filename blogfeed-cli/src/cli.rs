use std::process;

use anyhow::Result;
use blogfeed::{client::PostId, PostSource};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgMatches, Args, FromArgMatches, Parser, Subcommand};

use crate::{
    config::Config,
    render::{render, RenderOptions},
    shell,
};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    shell().set_quiet(cli.quiet);

    match cli.command {
        Command::Render { settings, args } => {
            let config = args.apply(settings.config);
            render(&config, &args.options()).await?;
            Ok(())
        }
        Command::Config { settings } => {
            match &settings.path {
                Some(path) => shell().status("Loaded", path),
                None => shell().status("Using", "default configuration"),
            }
            print!("{}", toml::to_string_pretty(&settings.config)?);
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Render a blog feed to HTML")]
struct Cli {
    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the feed and write it as an HTML page
    Render {
        #[command(flatten)]
        settings: Settings,
        #[command(flatten)]
        args: RenderArgs,
    },
    /// Print the configuration in effect
    Config {
        #[command(flatten)]
        settings: Settings,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Write the page to PATH instead of stdout
    #[arg(long, value_name = "PATH")]
    out: Option<Utf8PathBuf>,
    /// Render without indentation
    #[arg(long)]
    compact: bool,
    /// Expand the comments of a post; may be repeated
    #[arg(long, value_name = "ID")]
    show: Vec<PostId>,
    /// Fetch posts user by user instead of in one listing
    #[arg(long)]
    per_user: bool,
    /// Leave the author menu empty
    #[arg(long)]
    no_users: bool,
}

impl RenderArgs {
    fn apply(&self, mut config: Config) -> Config {
        if self.compact {
            config.render.pretty = false;
        }
        if self.per_user {
            config.posts = PostSource::PerUser;
        }
        if self.no_users {
            config.render.users = false;
        }
        config
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            out: self.out.clone(),
            show: self.show.clone(),
        }
    }
}

/// The loaded configuration and the file it came from.
struct Settings {
    config: Config,
    path: Option<Utf8PathBuf>,
}

impl Args for Settings {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::arg!(-c --config <PATH> "Path to the blogfeed.toml file"))
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }
}

impl FromArgMatches for Settings {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let config_path = matches.get_one::<String>("config").map(Utf8Path::new);
        let (config, path) = Config::discover(config_path).unwrap_or_else(|err| {
            shell().error(format!("{err:#}"));
            process::exit(1);
        });
        Ok(Self { config, path })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use blogfeed::PostSource;
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};
    use crate::config::Config;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_override_config() {
        let cli = Cli::try_parse_from([
            "blogfeed", "render", "--compact", "--per-user", "--no-users", "--show", "3",
            "--show", "5",
        ])
        .unwrap();
        let Command::Render { args, .. } = cli.command else {
            panic!("expected render");
        };

        let config = args.apply(Config::default());
        assert!(!config.render.pretty);
        assert!(!config.render.users);
        assert_eq!(config.posts, PostSource::PerUser);

        let options = args.options();
        assert_eq!(options.show.iter().map(|id| id.get()).collect::<Vec<_>>(), [3, 5]);
        assert!(options.out.is_none());
    }

    #[test]
    fn rejects_zero_post_ids() {
        assert!(Cli::try_parse_from(["blogfeed", "render", "--show", "0"]).is_err());
    }
}
