//! Honeydash - Entry Point
//!
//! Operator console for honeypot decoy services. Talks to the honeypot
//! backend API; all container and process management happens there.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use backend_api::models::{RealLogKind, StopServiceRequest};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use honeydash::app::options::AppOptions;
use honeydash::app::run::{run, Renderer, WatchOptions};
use honeydash::app::state::AppState;
use honeydash::catalog::{self, ServiceType};
use honeydash::config::form::{ConfigForm, RecordList};
use honeydash::config::registry::field_schema;
use honeydash::config::templates;
use honeydash::dashboard::view::DashboardState;
use honeydash::deploy::classify::DeployMode;
use honeydash::deploy::workflow::DeployOutcome;
use honeydash::errors::DashboardError;
use honeydash::logs::{init_logging, LogLevel, LogOptions};
use honeydash::models::honeypot::RunningHoneypot;
use honeydash::models::notification::Notification;
use honeydash::notify::render;
use honeydash::storage::layout::StorageLayout;
use honeydash::storage::settings::{export_file_name, SettingsStore};
use honeydash::utils::{today, version_info};
use honeydash::viewer::logs::{LogSource, LogsState};

/// Honeydash - operator console for honeypot decoy services
#[derive(Parser, Debug)]
#[command(name = "honeydash")]
#[command(about = "Configure, deploy and monitor honeypot decoys", long_about = None)]
struct Cli {
    /// Backend API base URL
    #[arg(long, global = true, env = "HONEYPOT_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Storage directory, defaults to ~/.honeydash
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List deployable honeypot types
    Catalog {
        #[arg(long)]
        search: Option<String>,
    },
    /// List presets for a honeypot type
    Templates {
        service: ServiceType,
    },
    /// Show the editable fields for a honeypot type
    Schema {
        service: String,
    },
    /// List running honeypots
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Keep the running honeypots list refreshed
    Watch,
    /// Validate and deploy a honeypot
    Deploy(DeployArgs),
    /// Stop a running honeypot
    Stop {
        /// Container id, process id or `<service>-<port>` name
        id: String,
        /// Treat `id` as a process id even if it is not listed
        #[arg(long)]
        process: bool,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show logs for a running honeypot
    Logs(LogsArgs),
    /// Show or change console settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct DeployArgs {
    service: String,

    /// Start from a named preset
    #[arg(long)]
    template: Option<String>,

    #[arg(long)]
    port: Option<String>,

    /// Set a field, e.g. `--set banner=SSH-2.0-OpenSSH_8.9`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// SSH user as `name:password[:sudo]`, replaces the defaults
    #[arg(long = "user", value_name = "NAME:PASS[:sudo]")]
    users: Vec<String>,
}

#[derive(Args, Debug)]
struct LogsArgs {
    id: String,

    #[arg(long, default_value = "container")]
    source: LogSource,

    /// auth, commands or messages
    #[arg(long, default_value = "auth")]
    kind: RealLogKind,

    #[arg(long)]
    search: Option<String>,

    /// Structured entries only
    #[arg(long)]
    level: Option<String>,

    /// Structured entries only
    #[arg(long)]
    threat: Option<String>,

    /// Keep refreshing until interrupted
    #[arg(long, short)]
    follow: bool,

    /// Write the displayed logs into this directory
    #[arg(long, value_name = "DIR")]
    download: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    /// Set a value by dotted key, e.g. `network.api_url`
    Set { key: String, value: String },
    Reset,
    Export { path: Option<PathBuf> },
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    let layout = cli
        .data_dir
        .clone()
        .map(StorageLayout::new)
        .unwrap_or_default();
    let settings = SettingsStore::new(layout.settings_file()).load().await;

    let log_options = LogOptions {
        log_level: cli
            .log_level
            .clone()
            .unwrap_or_else(|| settings.advanced.log_level.clone()),
        json_format: cli.json_logs,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let mut options = AppOptions::from_settings(&settings, layout);
    if let Some(api_url) = &cli.api_url {
        options.api_url = api_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        options.request_timeout = Duration::from_secs(timeout.max(1));
    }
    debug!("Running with options: {:?}", options);

    if let Err(e) = dispatch(cli.command, options).await {
        error!("Command failed: {e}");
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn dispatch(command: Command, options: AppOptions) -> Result<(), DashboardError> {
    let state = Arc::new(AppState::init(&options)?);

    match command {
        Command::Catalog { search } => {
            let entries = match search.as_deref() {
                Some(term) => state.dashboard.search_catalog(term),
                None => catalog::catalog().iter().collect(),
            };
            for entry in entries {
                println!(
                    "{:<12} {:<22} port {:<6} {}",
                    entry.id.bold(),
                    entry.name,
                    entry.default_port,
                    entry.description.dimmed()
                );
            }
            Ok(())
        }
        Command::Templates { service } => {
            for template in templates::templates(service) {
                println!("{:<16} {}", template.name.bold(), template.description);
            }
            Ok(())
        }
        Command::Schema { service } => {
            for field in field_schema(&service) {
                let required = if field.required { "*" } else { " " };
                println!(
                    "{}{:<28} {:<10} {}",
                    required,
                    field.key,
                    format!("{:?}", field.kind).to_lowercase(),
                    field.help.dimmed()
                );
            }
            Ok(())
        }
        Command::List { search } => {
            state.dashboard.poll().await?;
            let mut snapshot = state.dashboard.snapshot().await;
            if let Some(term) = search.as_deref() {
                snapshot.honeypots = state.dashboard.search(term).await;
            }
            print_dashboard(&snapshot);
            Ok(())
        }
        Command::Watch => {
            run(
                state.clone(),
                &options,
                WatchOptions {
                    dashboard: true,
                    follow_logs: false,
                },
                Arc::new(TerminalRenderer),
                await_shutdown_signal(),
            )
            .await
        }
        Command::Deploy(args) => deploy(&state, args).await,
        Command::Stop { id, process, yes } => stop(&state, &id, process, yes).await,
        Command::Logs(args) => logs(state, &options, args).await,
        Command::Settings { action } => settings_command(&state, action).await,
        Command::Version => Ok(()),
    }
}

async fn deploy(state: &AppState, args: DeployArgs) -> Result<(), DashboardError> {
    let mut form = match &args.template {
        Some(template) => {
            let service_type: ServiceType = args.service.parse().map_err(DashboardError::ValidationError)?;
            ConfigForm::from_template(service_type, template)?
        }
        None => ConfigForm::open(&args.service),
    };

    if let Some(port) = &args.port {
        form.set_field("port", port)?;
    }
    for field in &args.fields {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            DashboardError::ValidationError(format!("Expected KEY=VALUE, got '{}'", field))
        })?;
        form.set_field(key.trim(), value)?;
    }
    apply_users(&mut form, &args.users)?;

    let workflow = state.deploy_workflow(DeployMode::Create);
    let mut progress_rx = workflow.subscribe();
    let progress_printer = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let progress = progress_rx.borrow_and_update().clone();
            if progress.is_running() {
                eprint!(
                    "\r{:>3.0}% {}",
                    progress.simulated_percent, progress.status_message
                );
            }
        }
    });

    let outcome = workflow.submit(form.config(), || async {}).await;
    progress_printer.abort();
    eprintln!();

    if let Some(notification) = state.notifications.current() {
        render::print(&notification);
    }
    match outcome {
        DeployOutcome::Deployed { response, .. } => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        DeployOutcome::Rejected(issue) => Err(DashboardError::ValidationError(issue.to_string())),
        DeployOutcome::Busy => Err(DashboardError::Internal("A deploy is already running".to_string())),
        DeployOutcome::Failed(failure) => Err(DashboardError::Internal(
            failure.notification(DeployMode::Create).message,
        )),
    }
}

/// Replace the form's SSH users with `name:password[:sudo]` entries
fn apply_users(form: &mut ConfigForm, users: &[String]) -> Result<(), DashboardError> {
    for (i, entry) in users.iter().enumerate() {
        let mut parts = entry.splitn(3, ':');
        let username = parts.next().unwrap_or_default();
        let password = parts.next().ok_or_else(|| {
            DashboardError::ValidationError(format!("Expected NAME:PASS[:sudo], got '{}'", entry))
        })?;
        let sudo = parts.next().is_some_and(|s| s.eq_ignore_ascii_case("sudo"));

        let index = match form.len(RecordList::SshUsers) {
            Some(len) if i < len => i,
            _ => form.add(RecordList::SshUsers)?,
        };
        form.update(RecordList::SshUsers, index, "username", username)?;
        form.update(RecordList::SshUsers, index, "password", password)?;
        form.update(RecordList::SshUsers, index, "sudo", &sudo.to_string())?;
    }
    while let Some(len) = form
        .len(RecordList::SshUsers)
        .filter(|len| !users.is_empty() && *len > users.len())
    {
        form.remove(RecordList::SshUsers, len - 1)?;
    }
    Ok(())
}

async fn find_honeypot(state: &AppState, id: &str) -> Result<Option<RunningHoneypot>, DashboardError> {
    state.dashboard.poll().await?;
    if let Some(honeypot) = state.dashboard.find(id).await {
        return Ok(Some(honeypot));
    }
    Ok(state
        .dashboard
        .snapshot()
        .await
        .honeypots
        .into_iter()
        .find(|h| h.name == id))
}

async fn stop(state: &AppState, id: &str, process: bool, yes: bool) -> Result<(), DashboardError> {
    let honeypot = find_honeypot(state, id).await?;
    let label = honeypot.as_ref().map(|h| h.name.clone()).unwrap_or_else(|| id.to_string());

    if !yes && !confirm(state, "Stop Honeypot", &format!("Stop {}?", label)).await? {
        eprintln!("Cancelled");
        return Ok(());
    }

    match honeypot {
        Some(honeypot) => state.dashboard.stop(&honeypot).await?,
        None if process => {
            state.api.stop_service(&StopServiceRequest::process(id)).await?;
        }
        None => {
            return Err(DashboardError::NotFound(format!("No running honeypot matches '{}'", id)));
        }
    }
    render::print(&Notification::success("Honeypot Stopped", format!("{} stopped", label)));
    Ok(())
}

/// Show a prompt and run its confirm action when the operator answers yes
async fn confirm(state: &AppState, title: &str, message: &str) -> Result<bool, DashboardError> {
    let confirmed = Arc::new(AtomicBool::new(false));
    let flag = confirmed.clone();
    let prompt = Notification::warning(title, message).with_confirm(move || {
        flag.store(true, Ordering::SeqCst);
    });
    render::print(&prompt);
    let id = state.notifications.show(prompt);

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
        state.notifications.confirm();
    } else {
        state.notifications.dismiss_id(id);
    }
    Ok(confirmed.load(Ordering::SeqCst))
}

async fn logs(state: Arc<AppState>, options: &AppOptions, args: LogsArgs) -> Result<(), DashboardError> {
    let honeypot = find_honeypot(&state, &args.id)
        .await?
        .ok_or_else(|| DashboardError::NotFound(format!("No running honeypot matches '{}'", args.id)))?;

    let viewer = state.logs.clone();
    viewer.set_source(args.source).await;
    viewer.set_kind(args.kind).await;
    viewer.set_search(args.search.as_deref().unwrap_or_default()).await;
    viewer.set_level_filter(args.level.clone()).await;
    viewer.set_threat_filter(args.threat.clone()).await;
    viewer.select(honeypot).await;

    print_logs(&viewer.snapshot().await);

    if let Some(dir) = &args.download {
        if let Some(path) = viewer.download(dir).await? {
            println!("{}", path.display());
        }
        if let Some(notification) = state.notifications.current() {
            render::print(&notification);
        }
    }

    if args.follow {
        viewer.set_auto_refresh(true).await;
        run(
            state.clone(),
            options,
            WatchOptions {
                dashboard: false,
                follow_logs: true,
            },
            Arc::new(TerminalRenderer),
            await_shutdown_signal(),
        )
        .await?;
    }
    Ok(())
}

async fn settings_command(state: &AppState, action: SettingsAction) -> Result<(), DashboardError> {
    let store = &state.settings;
    match action {
        SettingsAction::Show => {
            let settings = store.load().await;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set { key, value } => {
            let mut settings = store.load().await;
            settings.set(&key, &value)?;
            store.save(&settings).await?;
            println!("{} = {}", key, settings.get(&key)?);
        }
        SettingsAction::Reset => {
            store.reset().await?;
            render::print(&Notification::success("Settings Reset", "Defaults restored"));
        }
        SettingsAction::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(&today())));
            store.export(&path).await?;
            render::print(&Notification::success(
                "Settings Exported",
                format!("Written to {}", path.display()),
            ));
        }
        SettingsAction::Import { path } => {
            store.import(&path).await?;
            render::print(&Notification::success("Settings Imported", "Settings imported successfully"));
        }
    }
    Ok(())
}

// ================================== OUTPUT ====================================== //

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn dashboard(&self, state: &DashboardState) {
        print_dashboard(state);
    }

    fn logs(&self, state: &LogsState) {
        print_logs(state);
    }

    fn notification(&self, notification: &Notification) {
        render::print(notification);
    }
}

fn print_dashboard(state: &DashboardState) {
    if let Some(error) = &state.connection_error {
        eprintln!("{}", error.red());
    }
    println!(
        "{} total, {} running, {} stopped",
        state.counts.total.to_string().bold(),
        state.counts.running.to_string().green(),
        state.counts.stopped.to_string().yellow()
    );
    for honeypot in &state.honeypots {
        let status = if honeypot.is_running() {
            honeypot.status.to_string().green()
        } else {
            honeypot.status.to_string().yellow()
        };
        println!(
            "{:<14} {:<16} {:<10} {:<9} {}",
            honeypot.identifier.chars().take(12).collect::<String>(),
            honeypot.name,
            honeypot.service_name,
            honeypot.runtime_kind,
            status
        );
    }
}

fn print_logs(state: &LogsState) {
    if let Some(error) = &state.error {
        eprintln!("{}", error.red());
    }
    let text = state.displayed_text();
    if !text.is_empty() {
        println!("{}", text);
    }
    if state.source == LogSource::Structured && !state.entries.is_empty() {
        for line in state.stats().summary_lines() {
            eprintln!("{}", line.dimmed());
        }
        for (key, value) in &state.statistics {
            eprintln!("{}", format!("{}: {}", key, value).dimmed());
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (Ok(mut sigterm), Ok(mut sigint)) =
            (signal(SignalKind::terminate()), signal(SignalKind::interrupt()))
        else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                debug!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        debug!("Ctrl+C received, shutting down...");
    }
}
