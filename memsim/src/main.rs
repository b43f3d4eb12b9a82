use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use clap::Parser;
use env_logger::Env;
use log::info;

use memlib::config::HierarchyConfig;
use memlib::io::read_trace;
use memlib::trace::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Multi-level cache hierarchy simulator"))]
struct Args {
    /// Path to the JSON hierarchy configuration
    config: String,

    /// Path to the access trace, one `R <hex address>` or `W <hex address>` per line
    trace: String,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(Env::default()).init();
    let start = Instant::now();
    let args = Args::parse();
    let config_file = File::open(&args.config)
        .map_err(|e| format!("Couldn't open the config file at path {}: {e}", args.config))?;
    let config: HierarchyConfig = serde_json::from_reader(BufReader::new(config_file))
        .map_err(|e| format!("Couldn't parse the config file: {e}"))?;
    let mut simulator =
        Simulator::new(&config).map_err(|e| format!("Invalid cache geometry: {e}"))?;
    let trace_file = File::open(&args.trace)
        .map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace_data = read_trace(trace_file)?;
    info!("replaying {} against {}", args.trace, args.config);
    let result = simulator
        .simulate(&trace_data)
        .map_err(|e| format!("Couldn't replay the trace: {e}"))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Couldn't serialise the output {e}"))?
    );
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!(
            "Simulation time: {}s",
            simulation_time.as_nanos() as f64 / 1e9
        );
        println!(
            "Total execution time (includes initial parsing, configuration, and output): {}s",
            total_time.as_nanos() as f64 / 1e9
        )
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let empty_lines = simulator.get_empty_line_counts();
        let formatted = config
            .caches
            .iter()
            .map(|level| level.name.clone())
            .zip(empty_lines.iter())
            .map(|(name, count)| format!("{name}: {}", *count))
            .reduce(|a, b| format!("{a}, {b}"))
            .unwrap_or_default();
        println!("Empty cache lines by level: ({formatted})");
        println!(
            "Total empty cache lines: {}",
            empty_lines.iter().sum::<u64>()
        )
    }
    Ok(())
}
