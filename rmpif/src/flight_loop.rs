//! Flight loop scheduler
//!
//! Calls the plugin's flight loop after whatever delay the previous call
//! asked for, until shutdown is requested.

use std::future::Future;
use std::time::Duration;

use rmp_engine::Plugin;
use tracing::{debug, info};

/// Drive `plugin` until `shutdown` resolves
pub async fn run<P: Plugin>(
    plugin: &mut P,
    initial_delay: Duration,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let mut delay = initial_delay;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            _ = tokio::time::sleep(delay) => {
                let next = plugin.flight_loop();
                if next != delay {
                    debug!("Flight loop interval now {:?}", next);
                }
                delay = next;
            }
        }
    }
}
