//! CLI - Command Line Interface for showdesk
//!
//! Every catalog operation is scriptable. All output is JSON-parseable with
//! `--json` (the default when stdout is not a terminal).
//!
//! # Examples
//!
//! ```bash
//! # List and create series
//! showdesk series list
//! showdesk series create --title "The Expanse" --poster-url https://cdn/x.png
//!
//! # Seasons and episodes under a parent
//! showdesk seasons create 5f0c... 1
//! showdesk episodes create 9a1b... --number 1 --title Pilot --duration 1400
//!
//! # Interactive admin session
//! showdesk admin
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::{classify, user_message, FailureKind};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// The server rejected the request
    Rejected = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<FailureKind> for ExitCode {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Validation => ExitCode::Rejected,
            FailureKind::Transport => ExitCode::NetworkError,
            FailureKind::Cancelled | FailureKind::Programming => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// showdesk - catalog administration for series, seasons and episodes
///
/// Run without arguments to start the interactive admin session.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "showdesk",
    version,
    about = "Administer a series / seasons / episodes catalog",
    long_about = "Manage a three-level content catalog (series, seasons, episodes) \
                  against a remote HTTP API.\n\n\
                  Run without arguments to start the interactive admin session.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  showdesk                                  Interactive admin session\n\
                  showdesk series list --json               List series as JSON\n\
                  showdesk seasons create <series-id> 2     Create season 2\n\
                  showdesk upload-poster poster.png         Upload a poster image"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog API (overrides SHOWDESK_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Subcommand to run (omit for the admin session)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if a one-shot command was given
    pub fn is_cli_mode(&self) -> bool {
        !matches!(self.command, None | Some(Command::Admin))
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List or create series
    Series(SeriesCmd),

    /// List or create the seasons of a series
    Seasons(SeasonsCmd),

    /// List or create the episodes of a season
    #[command(visible_alias = "eps")]
    Episodes(EpisodesCmd),

    /// Upload a poster image and print its URL
    UploadPoster(UploadPosterCmd),

    /// Interactive admin session over the three panels
    Admin,

    /// Show or update the config file
    Config(ConfigCmd),
}

#[derive(Args, Debug)]
pub struct SeriesCmd {
    #[command(subcommand)]
    pub action: SeriesAction,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SeriesAction {
    /// List all series
    #[command(visible_alias = "ls")]
    List,

    /// Create a series
    Create {
        /// Title (required, non-blank)
        #[arg(long, short = 't')]
        title: String,

        /// Free-text description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Poster image URL
        #[arg(long)]
        poster_url: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct SeasonsCmd {
    #[command(subcommand)]
    pub action: SeasonsAction,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SeasonsAction {
    /// List the seasons of a series, ordered by number
    #[command(visible_alias = "ls")]
    List {
        /// Owning series ID
        series_id: String,
    },

    /// Create a season
    Create {
        /// Owning series ID
        series_id: String,

        /// Season number (positive)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },
}

#[derive(Args, Debug)]
pub struct EpisodesCmd {
    #[command(subcommand)]
    pub action: EpisodesAction,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum EpisodesAction {
    /// List the episodes of a season, ordered by number
    #[command(visible_alias = "ls")]
    List {
        /// Owning season ID
        season_id: String,
    },

    /// Create an episode
    Create {
        /// Owning season ID
        season_id: String,

        /// Episode number (positive)
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,

        /// Title (required, non-blank)
        #[arg(long, short = 't')]
        title: String,

        /// Duration in whole seconds (positive)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,

        /// Video URL
        #[arg(long)]
        video_url: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct UploadPosterCmd {
    /// Image file (png, jpg, jpeg or webp)
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Store this API base URL in the config file
    #[arg(long = "set-api-url")]
    pub set_api_url: Option<String>,

    /// Store this request timeout (seconds) in the config file
    #[arg(long = "set-timeout", value_parser = clap::value_parser!(u64).range(1..))]
    pub set_timeout: Option<u64>,
}

impl ConfigCmd {
    pub fn is_update(&self) -> bool {
        self.set_api_url.is_some() || self.set_timeout.is_some()
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Poster upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print one entity: JSON, or its display line
    pub fn print_item<T: Serialize + Display>(&self, item: &T) -> anyhow::Result<()> {
        if self.json {
            self.print(item)
        } else {
            println!("{}", item);
            Ok(())
        }
    }

    /// Print a list: JSON, or one display line per item
    pub fn print_list<T: Serialize + Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            return self.print(items);
        }
        if items.is_empty() {
            self.info("(none)");
        }
        for item in items {
            println!("{}", item);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print the normalized message for a failed request
    pub fn failure(&self, err: &anyhow::Error) -> ExitCode {
        let code = ExitCode::from(classify(err));
        self.error(user_message(err), code)
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_admin_session() {
        let cli = Cli::parse_from::<_, &str>([]);
        assert!(!cli.is_cli_mode());

        let cli = Cli::parse_from(["showdesk", "admin"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "showdesk",
            "series",
            "list",
            "--json",
            "-q",
            "--api-url",
            "http://catalog:8080",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.api_url.as_deref(), Some("http://catalog:8080"));
        assert!(cli.is_cli_mode());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::Rejected), 4);
    }

    #[test]
    fn test_exit_code_for_failures() {
        let rejected = anyhow::Error::from(ApiError::Rejected {
            status: 400,
            body: None,
        });
        assert_eq!(ExitCode::from(classify(&rejected)), ExitCode::Rejected);

        let offline = anyhow::Error::from(ApiError::Transport("connection refused".into()));
        assert_eq!(ExitCode::from(classify(&offline)), ExitCode::NetworkError);

        let bug = anyhow::anyhow!("bad state");
        assert_eq!(ExitCode::from(classify(&bug)), ExitCode::Error);
    }

    #[test]
    fn test_json_output_shape() {
        let ok = serde_json::to_value(JsonOutput::success(UploadResponse { url: "u".into() })).unwrap();
        assert_eq!(ok, serde_json::json!({ "data": { "url": "u" } }));

        let err = serde_json::to_value(JsonOutput::<()>::error_msg("nope", ExitCode::Rejected)).unwrap();
        assert_eq!(err, serde_json::json!({ "error": "nope", "exit_code": 4 }));
    }
}
