use crate::availability::AvailabilityState;

/// Sink for human-readable state transitions. Implementations decide where
/// the text surfaces (banner overlay, log, test recorder).
pub trait StatusReporter {
    fn report(&mut self, state: AvailabilityState);
}

/// Reporter that writes transitions to the log.
#[derive(Debug, Default)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&mut self, state: AvailabilityState) {
        if state.is_degraded() {
            tracing::warn!(%state, "availability degraded");
        } else {
            tracing::info!(%state, "availability");
        }
    }
}

/// Reporter that records every transition, for tests and scenario demos.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    states: Vec<AvailabilityState>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> &[AvailabilityState] {
        &self.states
    }

    pub fn last(&self) -> Option<AvailabilityState> {
        self.states.last().copied()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&mut self, state: AvailabilityState) {
        self.states.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_transition_order() {
        let mut reporter = RecordingReporter::new();
        reporter.report(AvailabilityState::Loading);
        reporter.report(AvailabilityState::Ready);
        assert_eq!(
            reporter.states(),
            [AvailabilityState::Loading, AvailabilityState::Ready]
        );
        assert_eq!(reporter.last(), Some(AvailabilityState::Ready));
    }
}
