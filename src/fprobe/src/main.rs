// fprobe/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use fprobe::cli::{
    decode_offline, parse_type_offline, print_arrays, print_flat_array, print_location,
    print_types, run_transcript, Target,
};
use fprobe::ProbeConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fprobe")]
#[command(about = "Inspect Fortran arrays in a running program through gdb/MI", long_about = None)]
#[command(version = env!("FPROBE_CLI_VERSION"))]
struct Cli {
    /// Configuration file (defaults to ./fprobe.toml)
    #[arg(short, long, value_name = "FILE", global = true, env = "FPROBE_CONFIG")]
    config: Option<PathBuf>,

    /// gdb executable, overriding the configuration
    #[arg(long, value_name = "PATH", global = true)]
    gdb: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct TargetArgs {
    /// Program built with debug information
    program: PathBuf,

    /// Breakpoint location, e.g. simple.f90:8 (repeatable)
    #[arg(short, long = "break", value_name = "LOCATION")]
    breakpoints: Vec<String>,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Target {
            program: args.program,
            breakpoints: args.breakpoints,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decode arrays at the first stop
    Array {
        #[command(flatten)]
        target: TargetArgs,
        /// Variables to decode
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Read a 1-D real array without probing its type
    Flat {
        #[command(flatten)]
        target: TargetArgs,
        /// Variable to read
        name: String,
        /// Print only the first N elements
        #[arg(long, value_name = "N")]
        head: Option<usize>,
    },
    /// Print the parsed type of variables as JSON
    Type {
        #[command(flatten)]
        target: TargetArgs,
        /// Variables to describe
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show the source around the stop
    Where {
        #[command(flatten)]
        target: TargetArgs,
        /// Write an HTML page here instead of stdout
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },
    /// Run MI commands at the stop and render the replies
    Transcript {
        #[command(flatten)]
        target: TargetArgs,
        /// MI command to run (repeatable)
        #[arg(long = "cmd", value_name = "COMMAND", required = true)]
        commands: Vec<String>,
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },
    /// Parse a type string without a debugger
    ParseType {
        /// e.g. "real(kind=8) (3,4)"
        raw: String,
    },
    /// Decode a printed value against a type string without a debugger
    Decode {
        /// Type string the value was printed with
        #[arg(long = "type", value_name = "TYPE")]
        raw_type: String,
        /// Value as gdb printed it
        value: String,
    },
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = ProbeConfig::load(cli.config.as_deref())?;
    if let Some(gdb) = cli.gdb {
        config.gdb_path = gdb;
    }

    match cli.command {
        Commands::Array { target, names } => print_arrays(&config, &target.into(), &names),
        Commands::Flat { target, name, head } => {
            print_flat_array(&config, &target.into(), &name, head)
        }
        Commands::Type { target, names } => print_types(&config, &target.into(), &names),
        Commands::Where { target, html } => print_location(&config, &target.into(), html.as_deref()),
        Commands::Transcript {
            target,
            commands,
            html,
        } => run_transcript(&config, &target.into(), &commands, html.as_deref()),
        Commands::ParseType { raw } => parse_type_offline(&raw),
        Commands::Decode { raw_type, value } => decode_offline(&raw_type, &value),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
