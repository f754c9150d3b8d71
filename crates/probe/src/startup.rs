use crate::availability::AvailabilityState;
use crate::loader::ResourceLoader;
use crate::report::StatusReporter;
use glowrig_render::{AcquireError, RenderBackend, SurfaceSpec};

/// Identifier handed to the resource loader for the rendering library.
pub const LIBRARY_RESOURCE: &str = "render-library";

/// The terminal failure taxonomy. Each variant maps to exactly one degraded
/// state and one status message; none is retried or escalated further.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    #[error("resource load failed: {0}")]
    ResourceLoad(String),
    #[error("3D library unavailable: {0}")]
    LibraryMissing(String),
    #[error("render context creation failed: {0}")]
    ContextCreation(String),
}

impl ProbeError {
    pub fn state(&self) -> AvailabilityState {
        match self {
            ProbeError::ResourceLoad(_) => AvailabilityState::DegradedNetworkBlocked,
            ProbeError::LibraryMissing(_) => AvailabilityState::DegradedNoLibrary,
            ProbeError::ContextCreation(_) => AvailabilityState::DegradedNoGpu,
        }
    }
}

impl From<AcquireError> for ProbeError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::LibraryMissing(reason) => ProbeError::LibraryMissing(reason),
            AcquireError::ContextCreation(reason) => ProbeError::ContextCreation(reason),
        }
    }
}

/// Outcome of the startup pipeline. A render context exists exactly when the
/// session is Ready; degraded sessions never see one, which is what keeps
/// scene construction gated on a successful probe.
#[derive(Debug)]
pub enum Startup<C> {
    Ready { context: C },
    Degraded { error: ProbeError },
}

impl<C> Startup<C> {
    pub fn state(&self) -> AvailabilityState {
        match self {
            Startup::Ready { .. } => AvailabilityState::Ready,
            Startup::Degraded { error } => error.state(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Startup::Ready { .. })
    }

    pub fn into_context(self) -> Option<C> {
        match self {
            Startup::Ready { context } => Some(context),
            Startup::Degraded { .. } => None,
        }
    }
}

/// Probe the rendering capability for the given surface. Library absence is
/// detectable before any context is attempted, so that failure kind always
/// wins over context-creation failure.
pub fn probe<B: RenderBackend>(
    backend: &B,
    surface: &SurfaceSpec,
) -> Result<B::Context, ProbeError> {
    backend.acquire(surface).map_err(ProbeError::from)
}

/// The two-stage startup pipeline: load the rendering library resource, then
/// probe the capability. The single await point is the load; everything after
/// it is synchronous. Reports Loading once up front and the terminal state
/// exactly once.
pub async fn startup<L, B, R>(
    loader: &L,
    backend: &B,
    surface: &SurfaceSpec,
    reporter: &mut R,
) -> Startup<B::Context>
where
    L: ResourceLoader,
    B: RenderBackend,
    R: StatusReporter,
{
    reporter.report(AvailabilityState::Loading);

    if let Err(err) = loader.load(LIBRARY_RESOURCE).await {
        let error = ProbeError::ResourceLoad(err.to_string());
        tracing::warn!(%error, "startup degraded before probe");
        reporter.report(error.state());
        return Startup::Degraded { error };
    }

    match probe(backend, surface) {
        Ok(context) => {
            tracing::info!(
                width = surface.width,
                height = surface.height,
                "capability probe succeeded"
            );
            reporter.report(AvailabilityState::Ready);
            Startup::Ready { context }
        }
        Err(error) => {
            tracing::warn!(%error, "capability probe failed");
            reporter.report(error.state());
            Startup::Degraded { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BlockedLoader, StaticLoader};
    use crate::report::RecordingReporter;
    use glowrig_render::HeadlessBackend;

    fn surface() -> SurfaceSpec {
        SurfaceSpec::new(800, 600)
    }

    #[test]
    fn full_stack_reaches_ready() {
        let mut reporter = RecordingReporter::new();
        let outcome = pollster::block_on(startup(
            &StaticLoader,
            &HeadlessBackend::ready(),
            &surface(),
            &mut reporter,
        ));

        assert!(outcome.is_ready());
        assert_eq!(
            reporter.states(),
            [AvailabilityState::Loading, AvailabilityState::Ready]
        );
        assert!(outcome.into_context().is_some());
    }

    #[test]
    fn blocked_network_degrades_before_probe() {
        let mut reporter = RecordingReporter::new();
        let outcome = pollster::block_on(startup(
            &BlockedLoader,
            &HeadlessBackend::ready(),
            &surface(),
            &mut reporter,
        ));

        assert_eq!(outcome.state(), AvailabilityState::DegradedNetworkBlocked);
        assert_eq!(
            reporter.states(),
            [
                AvailabilityState::Loading,
                AvailabilityState::DegradedNetworkBlocked
            ]
        );
        assert!(outcome.into_context().is_none());
    }

    #[test]
    fn missing_library_degrades() {
        let mut reporter = RecordingReporter::new();
        let outcome = pollster::block_on(startup(
            &StaticLoader,
            &HeadlessBackend::missing_library(),
            &surface(),
            &mut reporter,
        ));

        assert_eq!(outcome.state(), AvailabilityState::DegradedNoLibrary);
        assert_eq!(reporter.last(), Some(AvailabilityState::DegradedNoLibrary));
        assert!(!outcome.is_ready());
    }

    #[test]
    fn failed_context_creation_degrades() {
        let mut reporter = RecordingReporter::new();
        let outcome = pollster::block_on(startup(
            &StaticLoader,
            &HeadlessBackend::without_gpu(),
            &surface(),
            &mut reporter,
        ));

        assert_eq!(outcome.state(), AvailabilityState::DegradedNoGpu);
        assert_eq!(reporter.last(), Some(AvailabilityState::DegradedNoGpu));
    }

    #[test]
    fn library_absence_wins_over_gpu_state() {
        // The library check precedes any context attempt, so a missing
        // library reports NoLibrary regardless of what the GPU would do.
        let err = probe(&HeadlessBackend::missing_library(), &surface()).unwrap_err();
        assert_eq!(err.state(), AvailabilityState::DegradedNoLibrary);
    }

    #[test]
    fn terminal_report_happens_exactly_once() {
        let mut reporter = RecordingReporter::new();
        let _ = pollster::block_on(startup(
            &StaticLoader,
            &HeadlessBackend::without_gpu(),
            &surface(),
            &mut reporter,
        ));
        let terminal = reporter
            .states()
            .iter()
            .filter(|s| **s != AvailabilityState::Loading)
            .count();
        assert_eq!(terminal, 1);
    }
}
