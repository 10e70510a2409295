//! staffopt CLI - Staffing Optimization Engine
//!
//! Command-line interface for creating, checking and solving staffing
//! requests.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "staffopt")]
#[command(author, version, about = "Staffing optimization engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter request file
    Init {
        /// Request file to create
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a request file and run the coverage pre-check
    Check {
        /// Request file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Solve a request file
    Solve {
        /// Request file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the plan as an Excel workbook
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Override the request's time limit, in seconds
        #[arg(long, value_name = "SECS", env = "STAFFOPT_TIME_LIMIT")]
        time_limit: Option<i64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    } else {
        EnvFilter::new(default_level)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Init { file, force }) => commands::init(&file, force),
        Some(Commands::Check { file }) => commands::check(&file),
        Some(Commands::Solve {
            file,
            format,
            output,
            xlsx,
            time_limit,
        }) => commands::solve(&commands::SolveArgs {
            file,
            format,
            output,
            xlsx,
            time_limit,
        }),
        None => {
            println!("staffopt - Staffing Optimization Engine");
            println!("Run with --help for usage information");
            Ok(ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    })
}
