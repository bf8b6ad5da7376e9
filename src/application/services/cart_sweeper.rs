//! Periodic empty-cart sweep
//!
//! Carts are created lazily and normally drained by order creation, but
//! a customer can empty one item by item and walk away. This task
//! deletes cart rows with zero items on an interval; the sweep targets
//! only already-empty carts, so running it next to live cart mutation
//! is safe.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::RepositoryProvider;

pub struct CartSweeper {
    repos: Arc<dyn RepositoryProvider>,
    interval: Duration,
}

impl CartSweeper {
    pub fn new(repos: Arc<dyn RepositoryProvider>, interval_secs: u64) -> Self {
        Self {
            repos,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Spawn the background sweep loop. The first sweep runs right away.
    pub fn start(&self) -> JoinHandle<()> {
        let repos = self.repos.clone();
        let every = self.interval;

        tokio::spawn(async move {
            info!("Cart sweeper running every {:?}", every);
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match repos.carts().sweep_empty().await {
                    Ok(0) => debug!("Cart sweep: nothing to do"),
                    Ok(n) => info!("Cart sweep removed {} empty carts", n),
                    Err(e) => warn!("Cart sweep failed: {}", e),
                }
            }
        })
    }
}
