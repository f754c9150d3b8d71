/// A resource the host could not deliver. No retry, no timeout: the loader
/// reports failure as soon as it knows, and the failure is permanent for the
/// session.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load resource `{identifier}`: {reason}")]
pub struct LoadError {
    pub identifier: String,
    pub reason: String,
}

/// Asynchronous acquisition of the rendering library resource, performed once
/// at startup, strictly before the capability probe runs.
pub trait ResourceLoader {
    fn load(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<(), LoadError>> + Send;
}

/// Loader for builds where the rendering library is statically linked: the
/// resource is always already present.
#[derive(Debug, Default)]
pub struct StaticLoader;

impl ResourceLoader for StaticLoader {
    async fn load(&self, identifier: &str) -> Result<(), LoadError> {
        tracing::debug!(identifier, "resource statically available");
        Ok(())
    }
}

/// Loader that always fails, simulating a host whose network path to the
/// rendering resources is blocked.
#[derive(Debug, Default)]
pub struct BlockedLoader;

impl ResourceLoader for BlockedLoader {
    async fn load(&self, identifier: &str) -> Result<(), LoadError> {
        Err(LoadError {
            identifier: identifier.into(),
            reason: "network blocked".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_loader_always_resolves() {
        assert!(pollster::block_on(StaticLoader.load("render-library")).is_ok());
    }

    #[test]
    fn blocked_loader_always_fails() {
        let err = pollster::block_on(BlockedLoader.load("render-library")).unwrap_err();
        assert_eq!(err.identifier, "render-library");
    }
}
