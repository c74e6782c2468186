//! CLI command definitions using Clap.
//!
//! Commands are organized into submodules by concern:
//!
//! - `wallpaper` - Wallpaper changes, the lock marker and session identity
//! - `schedule` - Cron task runner, daemon and schedule verification
//! - `config_cmd` - Configuration file creation and inspection
//! - `key` - Key device diagnostics

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::action::Action;
use crate::config::{self, Settings};
use crate::error::CarouselError;
use crate::logging::ExecutionMode;
use crate::schema;

pub mod config_cmd;
pub mod key;
pub mod schedule;
pub mod wallpaper;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit code for `status` when wallpaper changes are locked.
pub const EXIT_LOCKED: u8 = 125;

/// Carousel - scheduled desktop wallpaper rotation.
///
/// Without a subcommand, runs the scheduled jobs that are due this minute.
#[derive(Parser, Debug)]
#[command(name = "carousel")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Mark this run as started by a scheduler (cron, systemd timer).
    ///
    /// Logs go to carousel.log in the temporary directory instead of stderr.
    #[arg(long, global = true, env = "CAROUSEL_SCHEDULED")]
    pub scheduled: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Apply a random wallpaper from the default directory.
    Any,

    /// Apply the configured default wallpaper.
    Default,

    /// Apply a specific image file.
    #[command(visible_alias = "F")]
    File {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Apply a random wallpaper from a category.
    #[command(visible_alias = "C")]
    Category {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Apply a random wallpaper from a random category of a carousel.
    #[command(visible_alias = "G")]
    Carousel {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Stop scheduled wallpaper changes until unlocked.
    Lock,

    /// Allow scheduled wallpaper changes again.
    Unlock,

    /// Report whether wallpaper changes are locked.
    ///
    /// Exits with code 125 when locked.
    Status,

    /// Print the detected desktop session manager.
    Ident,

    /// Run the scheduled jobs that are due this minute.
    ///
    /// Intended to be called from cron every minute.
    Task {
        /// Also list when every other job fires next.
        #[arg(long, short)]
        next: bool,
    },

    /// Keep running scheduled jobs for a number of minutes.
    ///
    /// Runs the angel first action, then every due job on each minute
    /// boundary, then the angel last action.
    Daemon {
        #[arg(value_name = "MINUTES")]
        minutes: u32,
    },

    /// Check cron expressions and configuration consistency.
    Verify,

    /// Show each authorization factor of a key device.
    Key {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Create a configuration file with example values.
    #[command(after_long_help = r"Examples:
  carousel init              # Create config at default location
  carousel init --force      # Overwrite existing config
  carousel init --stdout     # Print template to stdout")]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Print the configuration template to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Print the loaded configuration.
    Config {
        /// Show the configuration search paths instead.
        #[arg(long)]
        path: bool,
    },

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(carousel completions --shell zsh)"
    ///   carousel completions --shell fish > ~/.config/fish/completions/carousel.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// The dispatcher action behind a wallpaper command, with its argument.
    #[must_use]
    pub fn action(&self) -> Option<(Action, &str)> {
        match self {
            Self::Any => Some((Action::AnyWallpaper, "")),
            Self::Default => Some((Action::DefaultWallpaper, "")),
            Self::File { path } => Some((Action::ChosenFile, path.as_str())),
            Self::Category { name } => Some((Action::ChosenCategory, name.as_str())),
            Self::Carousel { name } => Some((Action::ChosenCarousel, name.as_str())),
            Self::Lock => Some((Action::Lock, "")),
            Self::Unlock => Some((Action::Unlock, "")),
            Self::Status => Some((Action::Status, "")),
            Self::Ident => Some((Action::Identify, "")),
            _ => None,
        }
    }
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    #[must_use]
    pub const fn execution_mode(&self) -> ExecutionMode { ExecutionMode::from_flag(self.scheduled) }

    fn load_settings(&self) -> Result<Settings, CarouselError> {
        let (settings, path) = config::load(self.config_path().as_deref())?;
        tracing::debug!(path = %path.display(), "using configuration");
        Ok(settings)
    }

    /// Execute the CLI command and return the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<u8, CarouselError> {
        let scheduled_run = Commands::Task { next: false };
        let command = self.command.as_ref().unwrap_or(&scheduled_run);

        if let Some((action, argument)) = command.action() {
            return wallpaper::execute(&self.load_settings()?, action, argument);
        }

        match command {
            Commands::Task { next } => schedule::task(&self.load_settings()?, *next),
            Commands::Daemon { minutes } => schedule::daemon(&self.load_settings()?, *minutes),
            Commands::Verify => schedule::verify(&self.load_settings()?),
            Commands::Key { name } => key::execute(&self.load_settings()?, name),
            Commands::Init { force, stdout } => config_cmd::init(*force, *stdout, self.config_path()),
            Commands::Config { path: true } => config_cmd::show_paths(self.config_path().as_deref()),
            Commands::Config { path: false } => config_cmd::show(&self.load_settings()?),
            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(0)
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(0)
            }
            _ => Ok(0),
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "carousel", &mut io::stdout());
    }
}
