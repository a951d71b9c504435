//! PowerBlock System Test: main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  RpiBoard / SimBoard   ConsoleOperator   LogEventSink        │
//! │  (Board)               (OperatorPort)    (EventSink)         │
//! │  SystemCommandRunner   JsonConfigFile    StdDelay            │
//! │  (CommandRunner)       (ConfigPort)      (DelayNs)           │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │        Harness (script · SystemTest verdict)       │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{error, info};

use powerblock_systest::adapters::config_file::JsonConfigFile;
use powerblock_systest::adapters::console::ConsoleOperator;
use powerblock_systest::adapters::log_sink::LogEventSink;
use powerblock_systest::adapters::process::SystemCommandRunner;
use powerblock_systest::adapters::sim::SimBoard;
use powerblock_systest::adapters::time::{StdDelay, Uptime};
use powerblock_systest::app::events::HarnessEvent;
use powerblock_systest::app::ports::{Board, ConfigPort, EventSink, OperatorPort};
use powerblock_systest::app::service::Harness;
use powerblock_systest::config::{Backend, HarnessConfig};

fn main() -> Result<()> {
    // ── 1. Logging to the operator console ────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .init();

    info!("PowerBlock system test v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config (file or defaults) ──────────────────────────
    let config = JsonConfigFile::from_env()
        .load()
        .context("loading configuration")?;

    let mut operator = ConsoleOperator::stdio();
    let mut sink = LogEventSink::new();
    let uptime = Uptime::new();

    // ── 3. Backend selection + test loop ──────────────────────
    let outcome = match config.backend {
        Backend::Hardware => run_hardware(config, &mut operator, &mut sink),
        Backend::Simulated => {
            let mut board = SimBoard::new();
            run(&mut board, "simulated", config, &mut operator, &mut sink)
        }
    };

    if let Err(e) = &outcome {
        error!("Harness stopped after {}s: {:#}", uptime.secs(), e);
    }
    outcome
}

#[cfg(feature = "rpi")]
fn run_hardware(
    config: HarnessConfig,
    operator: &mut impl OperatorPort,
    sink: &mut impl EventSink,
) -> Result<()> {
    use powerblock_systest::adapters::rpi::RpiBoard;

    let mut board = RpiBoard::open().context("opening Raspberry Pi GPIO")?;
    run(&mut board, "rpi", config, operator, sink)
}

#[cfg(not(feature = "rpi"))]
fn run_hardware(
    _config: HarnessConfig,
    _operator: &mut impl OperatorPort,
    _sink: &mut impl EventSink,
) -> Result<()> {
    anyhow::bail!("hardware backend needs the `rpi` feature; use \"backend\": \"simulated\"")
}

fn run<B: Board>(
    board: &mut B,
    backend: &'static str,
    config: HarnessConfig,
    operator: &mut impl OperatorPort,
    sink: &mut impl EventSink,
) -> Result<()> {
    let mut harness = Harness::new(board, config, StdDelay::new(), SystemCommandRunner)
        .context("initialising fixture pins")?;
    sink.emit(&HarnessEvent::Ready(backend));

    match harness.run(operator, sink) {
        Ok(never) => match never {},
        Err(e) => {
            info!("{} cycle(s) started", harness.cycles());
            Err(e).context("test loop ended")
        }
    }
}
