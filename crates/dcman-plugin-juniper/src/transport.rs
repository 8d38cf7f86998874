//! Device session transport abstraction
//!
//! The plugins drive a `Transport` rather than a concrete NETCONF stack,
//! so the commit machinery is testable without a device. `LoopbackTransport`
//! is the built-in implementation: it accepts every load, records what was
//! sent, and can be scripted to fail a number of commits for retry testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use dcman_common::DcmanError;
use dcman_plugin::{DeviceFacts, DeviceMeta};
use tokio::sync::Mutex;

/// One configuration session with a device
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the session
    async fn connect(&self) -> Result<(), DcmanError>;

    /// Load a batch of command lines into the candidate configuration
    async fn load(&self, lines: &[String]) -> Result<(), DcmanError>;

    /// Commit the candidate configuration; returns device warnings
    async fn commit(&self) -> Result<Vec<String>, DcmanError>;

    /// Collect device identity facts
    async fn facts(&self) -> Result<DeviceFacts, DcmanError>;

    /// Close the session
    async fn close(&self) -> Result<(), DcmanError>;
}

/// Factory producing a transport bound to one device
pub type TransportFactory = Arc<dyn Fn(&DeviceMeta) -> Arc<dyn Transport> + Send + Sync>;

/// In-process transport stand-in.
///
/// Keeps every loaded batch for inspection and succeeds unconditionally,
/// except for a scripted number of leading commit failures.
pub struct LoopbackTransport {
    meta: DeviceMeta,
    loaded: Mutex<Vec<Vec<String>>>,
    committed: Mutex<Vec<Vec<String>>>,
    failing_commits: AtomicU32,
}

impl LoopbackTransport {
    pub fn new(meta: DeviceMeta) -> Self {
        Self {
            meta,
            loaded: Mutex::new(Vec::new()),
            committed: Mutex::new(Vec::new()),
            failing_commits: AtomicU32::new(0),
        }
    }

    /// Script the next `count` commits to fail with a transport error
    pub fn fail_next_commits(&self, count: u32) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    /// All batches committed so far, in commit order
    pub async fn committed(&self) -> Vec<Vec<String>> {
        self.committed.lock().await.clone()
    }

    /// Factory binding a fresh loopback transport per device
    pub fn factory() -> TransportFactory {
        Arc::new(|meta| Arc::new(LoopbackTransport::new(meta.clone())))
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn connect(&self) -> Result<(), DcmanError> {
        tracing::debug!(device = %self.meta.name, "loopback session opened");
        Ok(())
    }

    async fn load(&self, lines: &[String]) -> Result<(), DcmanError> {
        self.loaded.lock().await.push(lines.to_vec());
        Ok(())
    }

    async fn commit(&self) -> Result<Vec<String>, DcmanError> {
        let remaining = self.failing_commits.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_commits.store(remaining - 1, Ordering::SeqCst);
            return Err(DcmanError::TransportError(format!(
                "commit refused by {} (scripted failure)",
                self.meta.name
            )));
        }
        let mut loaded = self.loaded.lock().await;
        let mut committed = self.committed.lock().await;
        committed.append(&mut loaded);
        Ok(Vec::new())
    }

    async fn facts(&self) -> Result<DeviceFacts, DcmanError> {
        Ok(DeviceFacts {
            hostname: self.meta.name.clone(),
            model: self.meta.product.clone(),
            os_version: self
                .meta
                .os_version
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            serial_number: None,
        })
    }

    async fn close(&self) -> Result<(), DcmanError> {
        tracing::debug!(device = %self.meta.name, "loopback session closed");
        Ok(())
    }
}
