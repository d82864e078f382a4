pub mod cli;
pub mod config;
pub mod core;
pub mod coverage;
pub mod document;
pub mod git;
pub mod io;

pub use config::{GitSettings, ProviderKind, SettingsScope, SettingsStore};
pub use core::{
    Category, CoverageIssue, CoverageResult, ExportFormat, NodeSnapshot, ScanScope, VariableInfo,
};
pub use coverage::CoverageEngine;
pub use document::{DocumentSource, JsonDocument};
pub use git::{CommitFailure, CommitOutcome, GitProvider, ProviderError, ProviderRegistry};
