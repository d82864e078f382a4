use crate::config::{ProviderKind, SettingsScope};
use crate::core::{ExportFormat, ScanScope};
use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "designsync")]
#[command(about = "Design token coverage analysis and Git sync", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a document snapshot for hard-coded style values
    Scan {
        /// Path to a JSON document snapshot
        snapshot: PathBuf,

        /// Which pages to scan
        #[arg(long, value_enum, default_value = "smart")]
        scope: ScanScope,

        /// Export format, affects quality score weighting
        #[arg(long, value_enum, default_value = "css")]
        export_format: ExportFormat,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Commit a file to the configured repository and ensure a pull request
    Commit {
        /// Local file whose content is committed
        #[arg(long)]
        file: PathBuf,

        /// Destination path inside the repository
        #[arg(long)]
        path: String,

        /// Commit message
        #[arg(long)]
        message: String,

        /// Feature branch, defaults to the configured branch name
        #[arg(long)]
        branch: Option<String>,
    },

    /// Commit a generated component test on a per-component branch
    CommitTest {
        /// Component display name
        #[arg(long)]
        component: String,

        /// Local file with the generated test content
        #[arg(long)]
        file: PathBuf,
    },

    /// Manage stored Git settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the stored settings, token redacted
    Show,
    /// Save connection settings
    Save {
        #[arg(long, value_enum)]
        provider: ProviderKind,

        /// Project id (GitLab: id or namespace/project; GitHub: owner/repo)
        #[arg(long)]
        project_id: String,

        /// Access token, read from DESIGNSYNC_TOKEN when omitted
        #[arg(long, env = "DESIGNSYNC_TOKEN")]
        token: Option<String>,

        /// Self-hosted instance URL
        #[arg(long)]
        base_url: Option<String>,

        /// Default file path for token commits
        #[arg(long)]
        file_path: Option<String>,

        /// Feature branch name for token commits
        #[arg(long)]
        branch: Option<String>,

        #[arg(long, value_enum, default_value = "css")]
        export_format: ExportFormat,

        /// Storage scope
        #[arg(long, value_enum, default_value = "personal")]
        scope: SettingsScope,

        /// Persist the token alongside shared settings
        #[arg(long)]
        save_token: bool,
    },
    /// Delete all stored settings and tokens
    Reset,
    /// Remove stored tokens, keeping the rest of the settings
    ClearTokens,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
