use std::path::PathBuf;
use tracing::{info, Level};
use clap::Parser;
use aimtrace::{config::TraceConfig, trace, ErrorContext};

fn main_result() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.level())
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    // load config
    let mut config = match &args.config {
        Some(path) => TraceConfig::load(path).context("load trace config")?,
        None => {
            info!("no config file given, use the default write trace");
            TraceConfig::default()
        }
    };
    if let Some(output) = args.output {
        config.output = output;
    }

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // write trace
    let summary = trace::write_trace(&config).context("generate trace")?;
    info!("trace ready: {} data lines + EOC", summary.data_lines);

    Ok(())
}

fn main() {
    if let Err(e) = main_result() {
        eprint!("Err: {}\n", e);
        std::process::exit(1);
    }
}

/// AiM host request trace generator
#[derive(Parser, Debug)]
#[command(name = "aimtrace")]
#[command(about = "Generate AiM ISR traces for the DRAM simulator", long_about = None)]
struct Args {
    /// Path to a JSON trace config, defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the output trace path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    pub fn level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::INFO }
    }
}
