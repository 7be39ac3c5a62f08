//! Cooperative cancellation.
//!
//! Tick loops poll a shared flag between ticks; the Ctrl-C handler thread is
//! the only writer in a normal run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Shared stop flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Error::Cancelled)` once a stop was requested.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Cancel `token` on Ctrl-C.
///
/// # Errors
///
/// Fails if a handler is already installed for this process.
pub fn install_ctrlc_handler(token: &CancelToken) -> core::result::Result<(), ctrlc::Error> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Received interrupt, stopping after the current tick");
        token.cancel();
    })
}
