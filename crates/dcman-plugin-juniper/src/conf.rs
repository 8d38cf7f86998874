//! `JuniperConf`: vendor-wide baseline plugin implementation
//!
//! Owns the session lifecycle and the load/commit retry loop. Family
//! plugins (MX, QFX) compose this type and contribute their own rendering.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dcman_common::{DcmanError, VENDOR_JUNIPER};
use dcman_plugin::{
    CommitResult, ConfigDelta, DeviceConf, DeviceFacts, DeviceMeta, PluginDescriptor,
};

use crate::PLUGIN_NAME;
use crate::render::render_delta;
use crate::transport::{LoopbackTransport, Transport, TransportFactory};

/// Commit attempts before giving up on a push
pub const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Initial backoff between commit attempts, doubled per retry
const COMMIT_BACKOFF: Duration = Duration::from_millis(200);

pub struct JuniperConf {
    name: &'static str,
    meta: DeviceMeta,
    transport: Arc<dyn Transport>,
}

impl JuniperConf {
    pub fn new(meta: DeviceMeta, transport: Arc<dyn Transport>) -> Self {
        Self::with_name(PLUGIN_NAME, meta, transport)
    }

    /// Construct the baseline under a family plugin's name
    pub fn with_name(
        name: &'static str,
        meta: DeviceMeta,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name,
            meta,
            transport,
        }
    }

    pub fn meta(&self) -> &DeviceMeta {
        &self.meta
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Load rendered lines once, then commit with bounded retry.
    ///
    /// The candidate configuration survives a failed commit, so only the
    /// commit is retried. An empty batch commits nothing.
    pub async fn commit_lines(&self, lines: &[String]) -> Result<CommitResult, DcmanError> {
        if lines.is_empty() {
            return Ok(CommitResult::new(0).with_warning("empty delta, nothing committed"));
        }

        self.transport.load(lines).await?;

        let mut backoff = COMMIT_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.transport.commit().await {
                Ok(warnings) => {
                    let mut result = CommitResult::new(attempt);
                    result.warnings = warnings;
                    tracing::info!(
                        device = %self.meta.name,
                        plugin = %self.name,
                        lines = lines.len(),
                        attempts = attempt,
                        commit_id = %result.commit_id,
                        "configuration committed"
                    );
                    return Ok(result);
                }
                Err(e) if attempt < MAX_COMMIT_ATTEMPTS => {
                    tracing::warn!(
                        device = %self.meta.name,
                        attempt,
                        error = %e,
                        "commit failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(DcmanError::CommitError {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl DeviceConf for JuniperConf {
    fn name(&self) -> &str {
        self.name
    }

    fn vendor(&self) -> &str {
        VENDOR_JUNIPER
    }

    async fn initialize(&self) -> Result<(), DcmanError> {
        self.transport.connect().await
    }

    async fn fetch_facts(&self) -> Result<DeviceFacts, DcmanError> {
        self.transport.facts().await
    }

    async fn push_config(&self, delta: &ConfigDelta) -> Result<CommitResult, DcmanError> {
        delta.validate()?;
        self.commit_lines(&render_delta(delta)).await
    }

    async fn shutdown(&self) -> Result<(), DcmanError> {
        self.transport.close().await
    }
}

/// Registry descriptor for the baseline plugin with a custom transport
pub fn registration_with_transport(transport_factory: TransportFactory) -> PluginDescriptor {
    PluginDescriptor::new(
        PLUGIN_NAME,
        VENDOR_JUNIPER,
        Arc::new(move |meta: &DeviceMeta| {
            let transport = transport_factory(meta);
            Ok(Box::new(JuniperConf::new(meta.clone(), transport)) as Box<dyn DeviceConf>)
        }),
    )
}

/// Registry descriptor for the baseline plugin.
///
/// Claims every Juniper product and role; family plugins outrank it with
/// narrower product patterns.
pub fn registration() -> PluginDescriptor {
    registration_with_transport(LoopbackTransport::factory())
}

#[cfg(test)]
mod tests {
    use dcman_common::DeviceRole;

    use super::*;

    fn leaf_meta() -> DeviceMeta {
        DeviceMeta::new("leaf-1", "juniper", "ex4300", DeviceRole::Leaf)
            .with_management_ip("10.10.0.1")
    }

    #[tokio::test]
    async fn test_push_config_commits_rendered_lines() {
        let meta = leaf_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        let conf = JuniperConf::new(meta, transport.clone());

        conf.initialize().await.unwrap();
        let delta = ConfigDelta::new().set(&["system", "host-name"], "leaf-1");
        let result = conf.push_config(&delta).await.unwrap();

        assert_eq!(result.attempts, 1);
        assert_eq!(
            transport.committed().await,
            vec![vec!["set system host-name leaf-1".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_commit_retries_then_succeeds() {
        let meta = leaf_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        transport.fail_next_commits(2);
        let conf = JuniperConf::new(meta, transport.clone());

        let delta = ConfigDelta::new().set(&["system", "host-name"], "leaf-1");
        let result = conf.push_config(&delta).await.unwrap();
        assert_eq!(result.attempts, 3);
        assert_eq!(transport.committed().await.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_gives_up_after_max_attempts() {
        let meta = leaf_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        transport.fail_next_commits(MAX_COMMIT_ATTEMPTS);
        let conf = JuniperConf::new(meta, transport);

        let delta = ConfigDelta::new().set(&["system", "host-name"], "leaf-1");
        let err = conf.push_config(&delta).await.unwrap_err();
        assert!(matches!(
            err,
            DcmanError::CommitError {
                attempts: MAX_COMMIT_ATTEMPTS,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_delta_commits_nothing() {
        let meta = leaf_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        let conf = JuniperConf::new(meta, transport.clone());

        let result = conf.push_config(&ConfigDelta::new()).await.unwrap();
        assert_eq!(result.attempts, 0);
        assert!(transport.committed().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_path_op_rejected_before_load() {
        let meta = leaf_meta();
        let transport = Arc::new(LoopbackTransport::new(meta.clone()));
        let conf = JuniperConf::new(meta, transport.clone());

        let delta = ConfigDelta {
            ops: vec![dcman_plugin::ConfigOp::Set {
                path: Vec::new(),
                value: "leaf-1".to_string(),
            }],
        };
        let err = conf.push_config(&delta).await.unwrap_err();
        assert!(matches!(err, DcmanError::IllegalArgument(_)));
        assert!(transport.committed().await.is_empty());
    }

    #[tokio::test]
    async fn test_registration_factory_builds_instance() {
        let desc = registration();
        desc.validate().unwrap();
        let conf = (desc.factory)(&leaf_meta()).unwrap();
        assert_eq!(conf.name(), PLUGIN_NAME);
        assert_eq!(conf.vendor(), "juniper");
        conf.initialize().await.unwrap();
        let facts = conf.fetch_facts().await.unwrap();
        assert_eq!(facts.model, "ex4300");
    }
}
