//! MQL Hooks CLI
//!
//! The `mqlhooks` command is the host side of the editor/agent hooks.
//!
//! ## Commands
//!
//! - `dispatch`: Run every matching hook for one event
//! - `analyze`: Analyze a compile log
//! - `normalize-version`: Print the normalized form of a version string
//! - `fix-version`: Rewrite a `#property version` declaration
//! - `check-tasks`: Report standby or outstanding work
//! - `hooks`: List the hook configuration records

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mqlhooks_core::{
    analyze_compile_log, apply_version_fix, normalize_version, CompletionReport, ErrorAnalysis,
    EventContext, FixOutcome, HookOutcome, HookRegistry, HookTrigger, HooksConfig, PendingTask,
    RecompileOutcome, RecompileReport, TaskCompletionChecker, VersionFix,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "mqlhooks")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Editor and agent hooks for MQL4/MQL5 development", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Report format on stdout
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Hook configuration file (JSON)
    #[arg(long, global = true, env = "MQLHOOKS_CONFIG")]
    config: Option<PathBuf>,

    /// Workspace directory (overrides config and MQLHOOKS_WORKSPACE)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled hook matching an event
    ///
    /// Always exits 0: hook failures are logged, never raised to the host.
    Dispatch {
        /// Event name: file_saved, task_started or task_completed
        event: HookTrigger,

        /// Saved file, relative to the workspace
        #[arg(short, long)]
        file: Option<String>,

        /// Task label for task events
        #[arg(short, long)]
        task_type: Option<String>,

        /// Task status (task_completed defaults to "completed")
        #[arg(short, long)]
        status: Option<String>,

        /// Completion summary item (repeatable)
        #[arg(long)]
        summary: Vec<String>,

        /// Suggested next step (repeatable)
        #[arg(long)]
        next_step: Vec<String>,

        /// Event context as JSON, from a file or `-` for stdin
        #[arg(long)]
        context: Option<String>,

        /// Print the report before recompiles scheduled by auto-fixes finish
        #[arg(long)]
        no_wait: bool,
    },

    /// Analyze a compile log
    Analyze {
        /// Log file (default: the configured compile log)
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Print the normalized form of a version string
    NormalizeVersion {
        /// Invalid version, e.g. v1.2.3-beta
        value: String,
    },

    /// Rewrite the `#property version` declaration of a source file
    FixVersion {
        /// Source file, relative to the workspace
        file: PathBuf,

        /// Version currently declared
        old: String,

        /// Replacement (default: normalized `old`)
        #[arg(long)]
        new: Option<String>,
    },

    /// Report whether the agent can go on standby
    CheckTasks {
        /// Task label to report
        #[arg(short, long)]
        task_type: Option<String>,
    },

    /// List the hook configuration records
    Hooks,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        verbose,
        json,
        format,
        config,
        workspace,
        command,
    } = Cli::parse();

    // Setup logging
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    mqlhooks_core::init_tracing(json, level);

    let settings = load_settings(config.as_deref(), workspace.as_deref());

    match command {
        Commands::Dispatch {
            event,
            file,
            task_type,
            status,
            summary,
            next_step,
            context,
            no_wait,
        } => {
            let dispatched = async move {
                let settings = settings?;
                let ctx = build_context(
                    event,
                    file,
                    task_type,
                    status,
                    summary,
                    next_step,
                    context.as_deref(),
                )?;
                cmd_dispatch(&settings, &ctx, format, !no_wait).await
            };
            if let Err(e) = dispatched.await {
                error!(error = %format!("{e:#}"), "dispatch failed");
            }
            Ok(())
        }
        Commands::Analyze { log } => cmd_analyze(&settings?, log.as_deref(), format).await,
        Commands::NormalizeVersion { value } => {
            println!("{}", normalize_version(&value));
            Ok(())
        }
        Commands::FixVersion { file, old, new } => {
            cmd_fix_version(&settings?, &file, &old, new).await
        }
        Commands::CheckTasks { task_type } => {
            cmd_check_tasks(&settings?, task_type.as_deref(), format).await
        }
        Commands::Hooks => cmd_hooks(&settings?),
    }
}

/// Defaults, then the config file, then `MQLHOOKS_*`, then `--workspace`.
fn load_settings(config: Option<&Path>, workspace: Option<&Path>) -> Result<HooksConfig> {
    let mut settings = match config {
        Some(path) => HooksConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HooksConfig::default(),
    };
    settings
        .apply_env()
        .context("Invalid MQLHOOKS_* environment")?;
    if let Some(dir) = workspace {
        settings.workspace_dir = dir.to_path_buf();
    }
    Ok(settings)
}

/// Build the event context from an optional JSON document and CLI flags.
/// Flags override fields of the document.
fn build_context(
    event: HookTrigger,
    file: Option<String>,
    task_type: Option<String>,
    status: Option<String>,
    summary: Vec<String>,
    next_steps: Vec<String>,
    context: Option<&str>,
) -> Result<EventContext> {
    let mut ctx = match context {
        Some(source) => read_context(source)?,
        None => match event {
            HookTrigger::FileSaved => EventContext::file_saved(file.clone().unwrap_or_default()),
            HookTrigger::TaskStarted => EventContext::task_started(task_type.clone().unwrap_or_default()),
            HookTrigger::TaskCompleted => EventContext::task_completed(
                task_type.clone().unwrap_or_default(),
                Vec::new(),
                Vec::new(),
            ),
        },
    };

    ctx.event = event;
    if let Some(file) = file {
        ctx.file_name = Some(file.clone());
        ctx.file_path = Some(file);
    }
    if task_type.is_some() {
        ctx.task_type = task_type;
    }
    if status.is_some() {
        ctx.status = status;
    }
    if !summary.is_empty() {
        ctx.details.summary = summary;
    }
    if !next_steps.is_empty() {
        ctx.details.next_steps = next_steps;
    }

    // Blank values from the flag-built defaults mean "not given".
    ctx.file_name = ctx.file_name.filter(|s| !s.is_empty());
    ctx.file_path = ctx.file_path.filter(|s| !s.is_empty());
    ctx.task_type = ctx.task_type.filter(|s| !s.is_empty());
    Ok(ctx)
}

fn read_context(source: &str) -> Result<EventContext> {
    let text = if source == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read context from stdin")?
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read context file {source}"))?
    };
    serde_json::from_str(&text).context("Invalid event context JSON")
}

/// Run every matching hook against the configured compiler and speaker.
async fn cmd_dispatch(
    settings: &HooksConfig,
    ctx: &EventContext,
    format: Format,
    wait: bool,
) -> Result<()> {
    let registry = mqlhooks_runtime::default_registry(settings)?;
    run_dispatch(&registry, ctx, format, wait).await
}

/// Print the hook outcomes and drain every scheduled recompile.
///
/// With `wait` the recompile results are part of the report. Without it the
/// report is printed first, but the recompiles are still awaited so they run
/// and reach the hook log before the process exits.
async fn run_dispatch(
    registry: &HookRegistry,
    ctx: &EventContext,
    format: Format,
    wait: bool,
) -> Result<()> {
    let outcomes = registry.dispatch(ctx).await?;

    let mut handles = Vec::new();
    let mut rendered = Vec::new();
    for (name, mut outcome) in outcomes {
        if let HookOutcome::Compiled(report) = &mut outcome {
            handles.append(&mut report.recompiles);
        }
        rendered.push((name, outcome));
    }

    let mut recompiles = Vec::new();
    if wait {
        for handle in handles.drain(..) {
            recompiles.push(handle.wait().await);
        }
    }

    match format {
        Format::Json => {
            let doc = json!({
                "event": ctx.event,
                "hooks": rendered
                    .iter()
                    .map(|(name, outcome)| json!({ "hook": name, "outcome": outcome_json(outcome) }))
                    .collect::<Vec<_>>(),
                "recompiles": recompiles,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Format::Text => {
            if rendered.is_empty() {
                println!("No hooks matched {}", ctx.event);
            }
            for (name, outcome) in &rendered {
                print!("{}", render_outcome(name, outcome));
            }
            for report in &recompiles {
                print!("{}", render_recompile(report));
            }
        }
    }

    if !handles.is_empty() {
        tracing::info!(count = handles.len(), "finishing scheduled recompiles");
        for handle in handles {
            handle.wait().await;
        }
    }
    Ok(())
}

fn outcome_json(outcome: &HookOutcome) -> Value {
    match outcome {
        HookOutcome::Skipped { reason } => json!({ "status": "skipped", "reason": reason }),
        HookOutcome::Compiled(report) => json!({
            "status": outcome.label(),
            "target": report.target,
            "result": report.result,
            "analysis": report.analysis,
            "error_summary": report.error_summary,
            "fixes": report
                .fixes
                .iter()
                .map(|attempt| match &attempt.outcome {
                    Ok(result) => json!({ "fix": attempt.fix, "result": result }),
                    Err(error) => json!({ "fix": attempt.fix, "error": error }),
                })
                .collect::<Vec<_>>(),
        }),
        HookOutcome::Completion(report) => json!({ "status": outcome.label(), "report": report }),
        HookOutcome::Spoke { utterance } => json!({ "status": "spoke", "utterance": utterance }),
        HookOutcome::Failed { error } => json!({ "status": "failed", "error": error }),
    }
}

fn render_outcome(name: &str, outcome: &HookOutcome) -> String {
    let mut out = format!("[{name}] {}", outcome.label());
    match outcome {
        HookOutcome::Skipped { reason } => out.push_str(&format!(": {reason}\n")),
        HookOutcome::Compiled(report) => {
            out.push_str(&format!(
                ": {} (exit code {}, {}ms)\n",
                report.target, report.result.exit_code, report.result.duration_ms
            ));
            if let Some(analysis) = &report.analysis {
                out.push_str(&render_analysis(analysis));
            }
            for line in &report.error_summary {
                out.push_str(&format!("  {line}\n"));
            }
            for attempt in &report.fixes {
                let status = match &attempt.outcome {
                    Ok(FixOutcome::Applied { line }) => format!("applied at line {line}"),
                    Ok(FixOutcome::DeclarationNotFound) => "declaration not found".to_string(),
                    Err(e) => format!("failed: {e}"),
                };
                out.push_str(&format!(
                    "  auto-fix: \"{}\" -> \"{}\" ({status})\n",
                    attempt.fix.old, attempt.fix.new
                ));
            }
        }
        HookOutcome::Completion(report) => out.push_str(&render_completion(report)),
        HookOutcome::Spoke { utterance } => out.push_str(&format!(": \"{utterance}\"\n")),
        HookOutcome::Failed { error } => out.push_str(&format!(": {error}\n")),
    }
    out
}

fn render_analysis(analysis: &ErrorAnalysis) -> String {
    if analysis.is_clean() {
        return "  no known errors found\n".to_string();
    }
    let mut out = String::new();
    for (i, (error, suggestion)) in analysis
        .errors
        .iter()
        .zip(&analysis.suggestions)
        .enumerate()
    {
        out.push_str(&format!("  {}. {}\n", i + 1, error.message));
        out.push_str(&format!("     line: {}\n", error.raw_line));
        out.push_str(&format!("     fix:  {suggestion}\n"));
    }
    out.push_str(&format!("  auto-fixable: {}\n", analysis.auto_fixable));
    out
}

fn render_completion(report: &CompletionReport) -> String {
    match report {
        CompletionReport::Standby {
            task_type,
            summary,
            next_steps,
        } => {
            let mut out = format!(": {task_type} complete, standing by\n");
            for item in summary {
                out.push_str(&format!("  done: {item}\n"));
            }
            for step in next_steps {
                out.push_str(&format!("  next: {step}\n"));
            }
            out
        }
        CompletionReport::Remaining { task_type, tasks } => {
            let mut out = format!(": {task_type} has {} outstanding task(s)\n", tasks.len());
            out.push_str(&render_pending(tasks));
            out
        }
    }
}

fn render_pending(tasks: &[PendingTask]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format!("  {}. {}\n", i + 1, task.description))
        .collect()
}

fn render_recompile(report: &RecompileReport) -> String {
    let status = match &report.outcome {
        RecompileOutcome::Succeeded => "succeeded".to_string(),
        RecompileOutcome::StillFailing { exit_code } => {
            format!("still failing (exit code {exit_code})")
        }
        RecompileOutcome::Errored { error } => format!("errored: {error}"),
    };
    format!("[recompile] {}: {status}\n", report.target)
}

/// Analyze a compile log and print the result
async fn cmd_analyze(settings: &HooksConfig, log: Option<&Path>, format: Format) -> Result<()> {
    let path = match log {
        Some(path) => path.to_path_buf(),
        None => settings.compile_log_path(),
    };
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read compile log {}", path.display()))?;

    let analysis = analyze_compile_log(&text);
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        Format::Text => {
            println!("Compile log: {}", path.display());
            println!("Errors found: {}", analysis.errors.len());
            print!("{}", render_analysis(&analysis));
        }
    }
    Ok(())
}

/// Rewrite a version declaration in place
async fn cmd_fix_version(
    settings: &HooksConfig,
    file: &Path,
    old: &str,
    new: Option<String>,
) -> Result<()> {
    let fix = match new {
        Some(new) => VersionFix {
            old: old.to_string(),
            new,
        },
        None => VersionFix::for_invalid(old),
    };
    let path = settings.resolve(file);

    match apply_version_fix(&path, &fix)
        .await
        .with_context(|| format!("Failed to fix version in {}", path.display()))?
    {
        FixOutcome::Applied { line } => println!(
            "✓ {}:{line}: version \"{}\" -> \"{}\"",
            path.display(),
            fix.old,
            fix.new
        ),
        FixOutcome::DeclarationNotFound => println!(
            "✗ {}: no #property version \"{}\" declaration found",
            path.display(),
            fix.old
        ),
    }
    Ok(())
}

/// Evaluate the completion predicates without touching the status log
async fn cmd_check_tasks(
    settings: &HooksConfig,
    task_type: Option<&str>,
    format: Format,
) -> Result<()> {
    let checker = TaskCompletionChecker::from_config(settings);
    let tasks = checker.check_pending(SystemTime::now()).await;
    let task_type = task_type.unwrap_or("unspecified task").to_string();

    let report = if tasks.is_empty() {
        CompletionReport::Standby {
            task_type,
            summary: Vec::new(),
            next_steps: Vec::new(),
        }
    } else {
        CompletionReport::Remaining { task_type, tasks }
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", render_outcome("check-tasks", &HookOutcome::Completion(report))),
    }
    Ok(())
}

/// Print every hook configuration record as JSON
fn cmd_hooks(settings: &HooksConfig) -> Result<()> {
    let registry = mqlhooks_runtime::default_registry(settings)?;
    println!("{}", serde_json::to_string_pretty(&registry.configs())?);
    Ok(())
}
