//! # mealday
//!
//! Command-line front end for the meal-of-the-day scheduler.
//!
//! Usage:
//!   mealday print-report     # Terminal overview of every week
//!   mealday create-report    # Print the overview, then write planned/history reStructuredText
//!   mealday send             # Post today's message
//!   mealday stop             # Post the sold-out notice
//!   mealday status           # Today's state and the available action

mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mealday_notify::{DryRunNotifier, XNotifier};
use mealday_shared::{Notifier, Translator};
use mealday_store::{ReportPaths, ScheduleEngine, SystemClock};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Exit code for configuration, I/O and posting failures.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "mealday", version, about = "Meal-of-the-day message scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (overrides MEALDAY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Report output directory (overrides MEALDAY_REPORT_DIR)
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,

    /// Log messages instead of posting them; attempts are still recorded
    #[arg(long, global = true)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Print a short overview of every week
    PrintReport,
    /// Print the overview, then write the planned and history report documents
    CreateReport,
    /// Post today's message if it is sendable and not yet sent
    Send,
    /// Post the sold-out notice for today's sent message
    Stop,
    /// Show today's message state and the action available for it
    Status,
}

impl Commands {
    fn posts(self) -> bool {
        matches!(self, Commands::Send | Commands::Stop)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "info,mealday_store=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "mealday failed");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.report_dir {
        config.report_dir = dir.clone();
    }
    info!(?config, "Loaded configuration");

    // Read-only commands never post, so they do not need credentials.
    let notifier: Box<dyn Notifier> = if cli.dry_run || !cli.command.posts() {
        Box::new(DryRunNotifier)
    } else {
        Box::new(XNotifier::new(config.load_credentials())?)
    };

    let engine_config = config.engine_config();
    let translator = engine_config.translator.clone();
    let mut engine = ScheduleEngine::new(engine_config, Box::new(SystemClock), notifier);

    match cli.command {
        Commands::PrintReport => {
            engine.init()?;
            print!("{}", engine.render_text_report());
        }
        Commands::CreateReport => {
            create_report(&mut engine, &mut io::stdout().lock())?;
        }
        Commands::Send => report_dispatch(engine.dispatch_today()?, &translator),
        Commands::Stop => report_dispatch(engine.dispatch_stop()?, &translator),
        Commands::Status => print_status(&mut engine, &translator)?,
    }
    Ok(())
}

fn create_report(engine: &mut ScheduleEngine, out: &mut impl Write) -> anyhow::Result<ReportPaths> {
    engine.init()?;
    write!(out, "{}", engine.render_text_report())?;
    let paths = engine.render_document()?;
    writeln!(out, "{}", paths.planned.display())?;
    writeln!(out, "{}", paths.history.display())?;
    Ok(paths)
}

fn report_dispatch(sent: bool, t: &Translator) {
    if sent {
        println!("{}", t.get("Tweet was sent"));
    } else {
        println!("{}", t.get("Tweet was not sent, please see report for reason"));
        println!("{}", t.get("you can close this window now"));
    }
}

fn print_status(engine: &mut ScheduleEngine, t: &Translator) -> anyhow::Result<()> {
    let show_send = engine.should_show_send_prompt()?;
    let show_stop = engine.should_show_stop_prompt()?;

    let (_, week) = engine.current_key();
    println!("{} {} {}", engine.today().format("%d.%m.%Y"), t.get("calendarweek"), week);

    match engine.current_day()? {
        Some(day) => {
            let state = day
                .has_been_stopped(t)
                .or_else(|| day.has_been_sent(t))
                .unwrap_or_else(|| t.get("unsent").to_string());
            println!(
                "{} {}  {}",
                day.filepath.display(),
                day.status.unwrap_or_else(|| day.classify()),
                day.error_text(t, &state)
            );
        }
        None => println!("{}", t.get("no message for today")),
    }

    if show_send {
        println!("-> {}", t.get("send message"));
    } else if show_stop {
        println!("-> {}", t.get("send sold out"));
    }
    Ok(())
}
