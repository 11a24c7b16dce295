//! modsum CLI - summary-based dead code elimination at link time

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use modsum_cli::{dead_functions, logging, run_dump, run_index, run_lto, DriverError, LtoConfig};

#[derive(Parser)]
#[command(name = "modsum")]
#[command(about = "Whole-program dead code elimination over module summaries", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge module summaries, mark live functions and write the combined summary
    Lto {
        /// Input summary files
        inputs: Vec<PathBuf>,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Print the liveness trace for this symbol
        #[arg(long = "print-live-trace", value_name = "SYMBOL")]
        print_live_trace: Option<String>,
        /// Entry point symbol
        #[arg(long, default_value = "main")]
        entry: String,
        /// Do not treat any symbol as the entry point
        #[arg(long, conflicts_with = "entry")]
        no_entry: bool,
    },
    /// Build a module summary from a JSON facts file
    Index {
        /// Facts file
        facts: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print a summary file as JSON
    Dump {
        /// Summary file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
        /// Only list functions that are not live
        #[arg(long)]
        dead_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::initialize(&cli.log_level);

    let result = match cli.command {
        Commands::Lto {
            inputs,
            output,
            print_live_trace,
            entry,
            no_entry,
        } => cmd_lto(inputs, output, print_live_trace, entry, no_entry),
        Commands::Index { facts, output } => cmd_index(&facts, &output),
        Commands::Dump {
            file,
            pretty,
            dead_only,
        } => cmd_dump(&file, pretty, dead_only),
    };

    if let Err(err) = result {
        eprintln!("error[{}]: {}", err.code(), err);
        std::process::exit(err.exit_code());
    }
}

fn cmd_lto(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    trace_symbol: Option<String>,
    entry: String,
    no_entry: bool,
) -> Result<(), DriverError> {
    let config = LtoConfig::new(inputs, output)
        .with_trace_symbol(trace_symbol)
        .with_entry_symbol(if no_entry { None } else { Some(entry) });

    let outcome = run_lto(&config)?;
    if let Some(trace) = &outcome.trace {
        eprint!("{}", trace);
    }
    Ok(())
}

fn cmd_index(facts: &Path, output: &Path) -> Result<(), DriverError> {
    let index = run_index(facts, output)?;
    println!(
        "{} - {} functions, {} slots",
        index.name(),
        index.len(),
        index.slots().count()
    );
    Ok(())
}

fn cmd_dump(file: &Path, pretty: bool, dead_only: bool) -> Result<(), DriverError> {
    if dead_only {
        for label in dead_functions(file)? {
            println!("{}", label);
        }
    } else {
        println!("{}", run_dump(file, pretty)?);
    }
    Ok(())
}
