//! Per-operation step log owned by the tree

use tracing::trace;

use super::{Operation, Outcome, Step, Trace};

/// Ordered log of the steps taken by the operation in flight.
///
/// `begin` resets the log, so only the latest operation is ever retained.
#[derive(Debug)]
pub(crate) struct StepRecorder<K> {
    steps: Vec<Step<K>>,
    last: Option<Trace<K>>,
}

impl<K> Default for StepRecorder<K> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            last: None,
        }
    }
}

impl<K> StepRecorder<K> {
    /// Start a new operation, discarding the previous trace.
    pub(crate) fn begin(&mut self) {
        self.steps.clear();
        self.last = None;
    }

    /// Append one step.
    pub(crate) fn record(&mut self, step: Step<K>) {
        trace!(index = self.steps.len(), kind = %step.kind(), label = step.label(), "recorded step");
        self.steps.push(step);
    }

    /// Steps recorded so far for the operation in flight.
    pub(crate) fn pending(&self) -> &[Step<K>] {
        &self.steps
    }

    /// Trace of the most recently completed operation.
    pub(crate) fn last(&self) -> Option<&Trace<K>> {
        self.last.as_ref()
    }

    /// Forget everything.
    pub(crate) fn reset(&mut self) {
        self.steps.clear();
        self.last = None;
    }
}

impl<K: Clone> StepRecorder<K> {
    /// Close the operation, keep its trace and hand a copy to the caller.
    pub(crate) fn finish(&mut self, operation: Operation<K>, outcome: Outcome) -> Trace<K> {
        let trace = Trace::new(operation, outcome, std::mem::take(&mut self.steps));
        self.last = Some(trace.clone());
        trace
    }
}
