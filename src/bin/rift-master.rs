use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use rift_master::common::config::{Config, DEFAULT_CONFIG, config_file};
use rift_master::common::log;
use rift_master::layout_engine::LayoutEngine;
use rift_master::model::SimHost;
use rift_master::script::Script;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rift-master")]
#[command(about = "Replays master layout scripts against a simulated host")]
struct Cli {
    /// Script to replay. Read from standard input when omitted.
    script: Option<PathBuf>,

    /// Configuration file to use instead of ~/.rift-master.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check the configuration and exit.
    #[arg(long)]
    validate: bool,

    /// Print the default configuration and exit.
    #[arg(long)]
    print_default: bool,

    /// Pretty-print the resulting JSON.
    #[arg(long)]
    pretty: bool,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::read(&path),
        None if config_file().exists() => Config::read(&config_file()),
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let opt: Cli = Parser::parse();
    log::init_logging();

    if opt.print_default {
        print!("{DEFAULT_CONFIG}");
        return Ok(());
    }

    let mut config = load_config(opt.config)?;
    let issues = config.validate();
    if opt.validate {
        if !issues.is_empty() {
            bail!("invalid configuration:\n  {}", issues.join("\n  "));
        }
        println!("configuration ok");
        return Ok(());
    }
    for issue in &issues {
        warn!("{issue}");
    }
    if !issues.is_empty() {
        let fixes = config.auto_fix_values();
        info!(fixes, "fixed configuration values");
    }

    let text = match &opt.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading script from stdin")?;
            buf
        }
    };
    let script: Script = text.parse()?;

    let mut engine = LayoutEngine::new(&config.master);
    let mut host = SimHost::new();
    let snapshots = script.run(&mut engine, &mut host)?;

    let json = if opt.pretty {
        serde_json::to_string_pretty(&snapshots)?
    } else {
        serde_json::to_string(&snapshots)?
    };
    println!("{json}");
    Ok(())
}
