// src/engine/shutdown.rs

//! Shutdown requests shared between the Ctrl-C listener, the scan loop and
//! the dispatcher.
//!
//! The flag is sticky: once triggered it stays set, so a request made while
//! a pipeline is running is still seen when that pipeline returns.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

/// Sending half, held by whoever can ask for a shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: Arc<watch::Sender<bool>>,
}

/// Receiving half, checked between pipelines, between runs and while
/// sleeping between passes.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl ShutdownSignal {
    /// A signal nothing can trigger.
    pub fn never() -> Self {
        let (_trigger, signal) = shutdown_channel();
        signal
    }

    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a shutdown has been requested. Never resolves if every
    /// trigger is dropped without firing.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let requested = rx.wait_for(|requested| *requested).await.is_ok();
        if !requested {
            std::future::pending::<()>().await;
        }
    }
}

/// Install the process-wide Ctrl-C listener.
///
/// Installed once, before the first pass, so a Ctrl-C that arrives while a
/// pipeline is running is not lost.
pub fn spawn_ctrl_c_listener(trigger: ShutdownTrigger) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(
                    event_type = "shutdown_requested",
                    "Ctrl-C received; stopping after the current pipeline"
                );
                trigger.trigger();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl+C"),
        }
    });
}
