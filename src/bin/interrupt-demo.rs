//! Sample program for the interrupt watcher.
//!
//! Starts the watcher, registers a few handlers, then keeps registering
//! more while it counts. Interrupt it (Ctrl-C) to see the handlers run
//! newest first, followed by the quiet notice or the stack dump.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tutl::config::{apply_env_overrides, load_config};
use tutl::observability::init_logging;
use tutl::{InterruptConfig, InterruptMode, InterruptRegistry, InterruptWatcher};

#[derive(Parser)]
#[command(name = "interrupt-demo")]
#[command(about = "Counts while registering interrupt handlers", long_about = None)]
struct Cli {
    /// Number of 200ms counting steps
    #[arg(short, long, default_value_t = 10)]
    count: u32,

    /// Interrupt mode to request (fatal or quiet); overrides the config
    #[arg(short, long)]
    mode: Option<InterruptMode>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn note(registry: &InterruptRegistry, name: &'static str) {
    registry.register(move || println!("interrupt handler: {}", name));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("warn");
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => InterruptConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    let mode = cli.mode.unwrap_or(config.mode);

    let registry = Arc::new(InterruptRegistry::new());
    let watcher = Arc::new(InterruptWatcher::new(Arc::clone(&registry), config));
    watcher.spawn(mode)?;
    // A second, quieter request never downgrades the first.
    watcher.spawn(InterruptMode::Quiet)?;
    if !watcher.armed().await {
        tracing::warn!("Running without interrupt handling");
    }
    println!("Loaded...");

    let extras = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&extras);
    registry.register(move || println!("Ran {} extras", seen.load(Ordering::SeqCst)));
    note(&registry, "Second");
    note(&registry, "Third");
    println!("Counting...");

    for _ in 0..cli.count {
        let extras = Arc::clone(&extras);
        registry.register(move || {
            extras.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    Ok(())
}
