use anyhow::{anyhow, Context, Result};
use designsync::cli::{self, Commands, SettingsAction};
use designsync::config::{GitSettings, SettingsScope, SettingsStore};
use designsync::core::{ExportFormat, ScanScope};
use designsync::coverage::CoverageEngine;
use designsync::document::JsonDocument;
use designsync::git::{commit_component_test, commit_workflow, ProviderRegistry};
use designsync::io::{create_writer, OutputFormat};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::parse_args();

    match cli.command {
        Commands::Scan {
            snapshot,
            scope,
            export_format,
            format,
            output,
        } => run_scan(&snapshot, scope, export_format, format, output).await,
        Commands::Commit {
            file,
            path,
            message,
            branch,
        } => run_commit(&file, &path, &message, branch).await,
        Commands::CommitTest { component, file } => run_commit_test(&component, &file).await,
        Commands::Settings { action } => run_settings(action),
    }
}

async fn run_scan(
    snapshot: &Path,
    scope: ScanScope,
    export_format: ExportFormat,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let document = JsonDocument::load(snapshot)?;
    let engine = CoverageEngine::new(Arc::new(document), export_format);
    let result = engine.analyze(scope).await?;

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(sink, format).write_result(&result)
}

fn load_settings() -> Result<GitSettings> {
    let store = SettingsStore::default_location()?;
    store.migrate()?;
    store
        .load()?
        .ok_or_else(|| anyhow!("no settings stored, run `designsync settings save` first"))
}

async fn run_commit(
    file: &Path,
    path: &str,
    message: &str,
    branch: Option<String>,
) -> Result<()> {
    let settings = load_settings()?;
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let branch = branch.as_deref().unwrap_or_else(|| settings.branch());

    let registry = ProviderRegistry::new();
    let provider = registry.get(settings.provider);
    let outcome = commit_workflow(provider.as_ref(), &settings, message, path, &content, branch)
        .await
        .map_err(|failure| anyhow!("{failure}"))?;

    println!("committed {} on {}", outcome.commit_id, outcome.branch);
    if let Some(url) = outcome.pull_request_url {
        println!("pull request: {url}");
    }
    Ok(())
}

async fn run_commit_test(component: &str, file: &Path) -> Result<()> {
    let settings = load_settings()?;
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let registry = ProviderRegistry::new();
    let provider = registry.get(settings.provider);
    let outcome = commit_component_test(provider.as_ref(), &settings, component, &content)
        .await
        .map_err(|failure| anyhow!("{failure}"))?;

    println!("committed {} on {}", outcome.commit_id, outcome.branch);
    if let Some(url) = outcome.pull_request_url {
        println!("pull request: {url}");
    }
    Ok(())
}

fn run_settings(action: SettingsAction) -> Result<()> {
    let store = SettingsStore::default_location()?;
    match action {
        SettingsAction::Show => {
            store.migrate()?;
            match store.load()? {
                Some(mut settings) => {
                    if settings.token.is_some() {
                        settings.token = Some("<redacted>".to_string());
                    }
                    println!("{}", toml::to_string_pretty(&settings)?);
                    let info = store.token_info()?;
                    println!("token stored: {}", info.has_token);
                }
                None => println!("no settings stored"),
            }
        }
        SettingsAction::Save {
            provider,
            project_id,
            token,
            base_url,
            file_path,
            branch,
            export_format,
            scope,
            save_token,
        } => {
            let settings = GitSettings {
                provider,
                project_id,
                token,
                base_url,
                file_path,
                branch_name: branch,
                export_format,
                save_token,
                saved_by: std::env::var("USER").ok(),
                ..Default::default()
            };
            store.save(&settings, scope)?;
            let scope_name = match scope {
                SettingsScope::Personal => "personal",
                SettingsScope::Shared => "shared",
            };
            println!("settings saved ({scope_name})");
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("settings cleared");
        }
        SettingsAction::ClearTokens => {
            store.clear_all_tokens()?;
            println!("tokens cleared");
        }
    }
    Ok(())
}
