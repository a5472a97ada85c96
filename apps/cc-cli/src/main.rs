use cc_app::{AppError, AppResult, RunOptions, project_service, run_service};
use cc_project::schema::{ClimateConfig, FormatDef};
use cc_runtime::{ConsoleSink, RunReport, RuntimeHandle};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(about = "Climate control runtime - concurrent control state monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate config file syntax and structure
    Validate {
        /// Path to the config file (YAML or JSON)
        config_path: PathBuf,
    },
    /// List controls and tasks in a config
    Controls {
        /// Path to the config file (YAML or JSON)
        config_path: PathBuf,
    },
    /// Run the controls described by a config
    Run {
        /// Path to the config file (YAML or JSON)
        config_path: PathBuf,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Run the built-in temperature/fan/mode demo
    Demo {
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Stop after this many seconds (default: stop when Enter is pressed)
    #[arg(long)]
    duration_s: Option<f64>,
    /// Output format, overriding the config
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for FormatDef {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => FormatDef::Text,
            FormatArg::Json => FormatDef::Json,
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Controls { config_path } => cmd_controls(&config_path),
        Commands::Run {
            config_path,
            session,
        } => {
            let config = project_service::load_config(&config_path)?;
            cmd_run(&config, &session)
        }
        Commands::Demo { session } => cmd_run(&cc_app::demo_config(), &session),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    // Loading validates.
    let config = project_service::load_config(config_path)?;
    println!("✓ Config '{}' is valid", config.name);
    Ok(())
}

fn cmd_controls(config_path: &Path) -> AppResult<()> {
    let config = project_service::load_config(config_path)?;
    let summary = project_service::summarize(&config);

    println!("Controls in {}:", summary.name);
    for control in &summary.controls {
        println!(
            "  {} - {} (initial {}, history {})",
            control.name, control.range, control.initial, control.history_capacity
        );
    }
    if config.tasks.is_empty() {
        println!("No tasks defined");
    } else {
        println!("Tasks:");
        for task in &config.tasks {
            println!(
                "  {} every {} ms -> {}",
                task.name,
                task.period_ms,
                task.targets.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_run(config: &ClimateConfig, session: &SessionArgs) -> AppResult<()> {
    let duration = match session.duration_s {
        Some(s) => match Duration::try_from_secs_f64(s) {
            Ok(d) if !d.is_zero() => Some(d),
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "duration must be a positive number of seconds, got {}",
                    s
                )));
            }
        },
        None => None,
    };
    let options = RunOptions {
        duration,
        format: session.format.map(FormatDef::from),
    };

    if duration.is_none() {
        println!("Running {} (press Enter to stop)", config.name);
    }

    let report = run_service::run_session(config, &options, Box::new(ConsoleSink), |handle| {
        if duration.is_none() {
            stop_on_enter(handle);
        }
    })?;

    print_report(&report);
    Ok(())
}

/// Trigger shutdown when a line (or EOF) arrives on stdin.
///
/// The reader thread is detached: a blocking stdin read cannot be cancelled,
/// so it may outlive a run that ends another way. Process exit reclaims it.
fn stop_on_enter(handle: &RuntimeHandle) {
    let shutdown = handle.shutdown_signal();
    let spawned = thread::Builder::new()
        .name("cc-stdin".to_string())
        .spawn(move || {
            let mut line = String::new();
            let _ = io::stdin().lock().read_line(&mut line);
            shutdown.trigger();
        });
    if let Err(e) = spawned {
        tracing::error!(error = %e, "cannot watch stdin; stopping immediately");
        handle.shutdown_signal().trigger();
    }
}

fn print_report(report: &RunReport) {
    println!();
    println!("✓ Stopped after {:.1} s", report.elapsed.as_secs_f64());
    println!("  Frames rendered: {}", report.frames_rendered);
    for task in &report.tasks {
        println!(
            "  {}: {} ticks, {} failures, {} panics, lock held avg {:.3} ms (max {:.3} ms)",
            task.name,
            task.ticks,
            task.failures,
            task.panics,
            task.lock_hold.average.as_secs_f64() * 1e3,
            task.lock_hold.max.as_secs_f64() * 1e3,
        );
    }
}
