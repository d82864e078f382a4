//! Git settings persistence.
//!
//! Settings live as TOML files under a storage root, one file per scope:
//! personal (this user only) and shared (checked-in team configuration).
//! The token is stripped from the shared file unless `save_token` is set,
//! in which case it is also mirrored into a personal token file so team
//! members load the shared config with their own credential.
//!
//! Legacy single-file settings are normalized by [`SettingsStore::migrate`],
//! run once at startup; read paths only know the current shape.

use crate::core::ExportFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported remote Git hosting backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gitlab,
    Github,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gitlab => write!(f, "gitlab"),
            ProviderKind::Github => write!(f, "github"),
        }
    }
}

/// Persistent configuration for one repository connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    pub provider: ProviderKind,
    /// Self-hosted instance URL; the public cloud endpoint when absent.
    pub base_url: Option<String>,
    /// GitLab: numeric id or `namespace/project`; GitHub: `owner/repo`.
    pub project_id: String,
    pub token: Option<String>,
    pub file_path: Option<String>,
    pub test_file_path: Option<String>,
    pub strategy: Option<String>,
    pub branch_name: Option<String>,
    pub test_branch_name: Option<String>,
    pub export_format: ExportFormat,
    pub save_token: bool,
    pub saved_at: Option<DateTime<Utc>>,
    pub saved_by: Option<String>,
    /// Set on load: whether the settings came from the personal scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_personal: Option<bool>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gitlab,
            base_url: None,
            project_id: String::new(),
            token: None,
            file_path: None,
            test_file_path: None,
            strategy: None,
            branch_name: None,
            test_branch_name: None,
            export_format: ExportFormat::Css,
            save_token: false,
            saved_at: None,
            saved_by: None,
            is_personal: None,
        }
    }
}

impl GitSettings {
    pub const DEFAULT_BRANCH: &'static str = "design-tokens-update";
    pub const DEFAULT_TEST_BRANCH: &'static str = "design-tests";
    pub const DEFAULT_TEST_FILE_PATH: &'static str = "components/{componentName}.spec.ts";

    pub fn branch(&self) -> &str {
        self.branch_name.as_deref().unwrap_or(Self::DEFAULT_BRANCH)
    }

    pub fn test_branch(&self) -> &str {
        self.test_branch_name
            .as_deref()
            .unwrap_or(Self::DEFAULT_TEST_BRANCH)
    }

    pub fn test_file_template(&self) -> &str {
        self.test_file_path
            .as_deref()
            .unwrap_or(Self::DEFAULT_TEST_FILE_PATH)
    }
}

/// Which storage scope a save targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SettingsScope {
    Personal,
    Shared,
}

/// Credential storage status, without the credential itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub has_token: bool,
    pub encrypted: bool,
    pub version: String,
}

const PERSONAL_FILE: &str = "settings-personal.toml";
const SHARED_FILE: &str = "settings-shared.toml";
const TOKEN_FILE: &str = "token";
const LEGACY_FILE: &str = "gitlab-settings.toml";
const STORE_VERSION: &str = "2";

/// File-backed settings store rooted at a directory.
pub struct SettingsStore {
    root: PathBuf,
}

impl SettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform config directory.
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir().context("no config directory available")?;
        Ok(Self::new(base.join("designsync")))
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn scope_path(&self, scope: SettingsScope) -> PathBuf {
        match scope {
            SettingsScope::Personal => self.path(PERSONAL_FILE),
            SettingsScope::Shared => self.path(SHARED_FILE),
        }
    }

    /// Persist settings to one scope. The shared scope never receives the
    /// token unless `save_token` is set; with `save_token` the token is also
    /// written to the personal token file.
    pub fn save(&self, settings: &GitSettings, scope: SettingsScope) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let mut to_save = settings.clone();
        to_save.saved_at = Some(settings.saved_at.unwrap_or_else(Utc::now));
        to_save.is_personal = None;

        if scope == SettingsScope::Shared {
            if settings.save_token {
                if let Some(token) = &settings.token {
                    write_private(&self.path(TOKEN_FILE), token)?;
                }
            } else {
                to_save.token = None;
            }
        }

        let rendered = toml::to_string_pretty(&to_save).context("failed to encode settings")?;
        write_private(&self.scope_path(scope), &rendered)
    }

    /// Load settings, shared scope first, then personal. Returns `None` when
    /// nothing is stored.
    pub fn load(&self) -> Result<Option<GitSettings>> {
        if let Some(mut settings) = self.read_scope(SettingsScope::Shared)? {
            if settings.save_token && settings.token.is_none() {
                settings.token = self.read_token()?;
            }
            settings.is_personal = Some(false);
            return Ok(Some(settings));
        }

        if let Some(mut settings) = self.read_scope(SettingsScope::Personal)? {
            settings.is_personal = Some(true);
            return Ok(Some(settings));
        }

        Ok(None)
    }

    fn read_scope(&self, scope: SettingsScope) -> Result<Option<GitSettings>> {
        read_settings_file(&self.scope_path(scope))
    }

    fn read_token(&self) -> Result<Option<String>> {
        let path = self.path(TOKEN_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Remove every stored settings file, token included.
    pub fn reset(&self) -> Result<()> {
        for file in [PERSONAL_FILE, SHARED_FILE, TOKEN_FILE, LEGACY_FILE] {
            remove_if_present(&self.path(file))?;
        }
        Ok(())
    }

    /// Remove stored credentials only, keeping the rest of the settings.
    pub fn clear_all_tokens(&self) -> Result<()> {
        remove_if_present(&self.path(TOKEN_FILE))?;
        for scope in [SettingsScope::Personal, SettingsScope::Shared] {
            if let Some(mut settings) = self.read_scope(scope)? {
                if settings.token.take().is_some() {
                    let rendered =
                        toml::to_string_pretty(&settings).context("failed to encode settings")?;
                    write_private(&self.scope_path(scope), &rendered)?;
                }
            }
        }
        Ok(())
    }

    pub fn token_info(&self) -> Result<TokenInfo> {
        let stored = self.read_token()?.is_some()
            || self
                .load()?
                .map(|s| s.token.is_some())
                .unwrap_or(false);
        Ok(TokenInfo {
            has_token: stored,
            encrypted: false,
            version: STORE_VERSION.to_string(),
        })
    }

    /// Normalize a legacy settings file into the current shape. Legacy files
    /// predate multi-provider support, so a missing provider means GitLab.
    /// They also predate scoped storage and kept the token inline, so they
    /// migrate into the personal scope, which preserves the token.
    /// Returns whether a migration happened.
    pub fn migrate(&self) -> Result<bool> {
        let legacy_path = self.path(LEGACY_FILE);
        let Some(legacy) = read_settings_file(&legacy_path)? else {
            return Ok(false);
        };

        info!("migrating legacy settings from {}", legacy_path.display());
        self.save(&legacy, SettingsScope::Personal)?;
        remove_if_present(&legacy_path)?;
        Ok(true)
    }
}

fn read_settings_file(path: &Path) -> Result<Option<GitSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let settings =
        toml::from_str(&raw).with_context(|| format!("invalid settings file {}", path.display()))?;
    Ok(Some(settings))
}

fn write_private(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict {}", path.display()))?;
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}
