//! Artemis Arrow CLI - traffic-mirroring sensor
//!
//! Usage: artemis-arrow <COMMAND>
//!
//! Commands:
//!   run         Capture and mirror traffic to the collector
//!   interfaces  Show each interface with its selection verdict
//!   check       Validate a configuration file

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use artemis_arrow::events::{ok_icon, Event, Reporter};
use artemis_arrow::{capture, export, iface, Config};

/// Artemis Arrow - traffic-mirroring sensor
#[derive(Parser, Debug)]
#[command(name = "artemis-arrow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit NDJSON events instead of text
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture and mirror traffic to the collector
    Run {
        /// Path to the configuration file
        #[arg(short, long, default_value = "conf.yaml")]
        config: PathBuf,
    },

    /// Show each interface with its selection verdict
    Interfaces {
        /// Path to the configuration file
        #[arg(short, long, default_value = "conf.yaml")]
        config: PathBuf,
    },

    /// Validate a configuration file
    Check {
        /// Path to the configuration file
        #[arg(short, long, default_value = "conf.yaml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => cmd_run(&config, cli.json, cli.verbose),
        Commands::Interfaces { config } => cmd_interfaces(&config, cli.json),
        Commands::Check { config } => cmd_check(&config, cli.json),
    }
}

fn cmd_run(config_path: &PathBuf, json: bool, verbose: u8) -> Result<()> {
    let config = Config::load(config_path)?;
    let reporter = Reporter::new(json, verbose);

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })?;

    capture::run(&config, &reporter, shutdown)?;
    Ok(())
}

fn cmd_interfaces(config_path: &PathBuf, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    // Verdicts are the whole point here, so force them visible.
    let reporter = Reporter::new(json, 1);

    let control = config.control_network()?;
    let surveyed = iface::survey(&control);
    let mut capturable = 0usize;
    for (interface, verdict) in &surveyed {
        reporter.emit(&Event::InterfaceVerdict {
            name: interface.name.clone(),
            addresses: interface.ips.iter().map(|n| n.to_string()).collect(),
            verdict: *verdict,
        });
        if verdict.is_capture() {
            capturable += 1;
        }
    }

    if !json {
        println!(
            "{} of {} interface(s) would be captured",
            capturable,
            surveyed.len()
        );
    }
    Ok(())
}

fn cmd_check(config_path: &PathBuf, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    // Resolution failures should surface here, not at 3am on deployment.
    let collector = export::resolve_collector(&config.dest_host, config.dest_port)?;

    if json {
        let output = serde_json::json!({
            "event": "check",
            "status": "ok",
            "collector": collector.to_string(),
            "control_net": config.control_net,
            "vni": config.vni,
            "filtered": !config.filter.is_empty(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} configuration is valid", ok_icon());
        println!("  collector:   {}", collector);
        println!("  control net: {}", config.control_net);
        println!("  vni:         {}", config.vni);
        if config.filter.is_empty() {
            println!("  filter:      none (mirror everything)");
        } else {
            println!("  filter:      configured");
        }
    }
    Ok(())
}
