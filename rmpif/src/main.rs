//! RMP Interface
//!
//! Connects an Arduino based radio management panel to the simulator's COM1
//! radio and pitch trim. The port name is read from `rmpif.cfg` (path given
//! as the first argument, or the rmpif config directory).
//!
//! Without a simulator host to load into, the bridge runs against an
//! in-memory simulator store, which is enough to exercise a panel end to end.

mod flight_loop;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use rmp_engine::{EndpointSource, Plugin, RmpHost, SerialConnector, INITIAL_DELAY};
use rmp_sim::MemoryStore;
use settings::Settings;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rmpif=info,rmp_panel=info,rmp_protocol=info,rmp_engine=info,rmp_sim=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let endpoint_path = match Settings::endpoint_path(std::env::args().nth(1).map(PathBuf::from)) {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::load_beside(&endpoint_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let sim = MemoryStore::with_bindings(&settings.engine.bindings);
    let mut host = RmpHost::new(
        settings.engine,
        SerialConnector::new(settings.serial),
        sim,
        EndpointSource::File(endpoint_path),
    );

    if host.start().is_err() {
        return ExitCode::FAILURE;
    }
    if host.enable().is_err() {
        host.stop();
        return ExitCode::FAILURE;
    }

    flight_loop::run(&mut host, INITIAL_DELAY, shutdown_signal()).await;

    host.stop();
    info!("Stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
