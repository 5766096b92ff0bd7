//! Step-by-step playback over a recorded trace
//!
//! A viewer shows one step at a time and moves forward or back through the
//! trace; the cursor never leaves `[0, len)`.

use crate::step::{Step, Trace};

/// Cursor over an ordered slice of steps.
#[derive(Debug, Clone)]
pub struct Playback<'a, K> {
    steps: &'a [Step<K>],
    position: usize,
}

impl<'a, K> Playback<'a, K> {
    /// Start at the first step.
    pub fn new(steps: &'a [Step<K>]) -> Self {
        Self { steps, position: 0 }
    }

    /// Start at the first step of `trace`.
    pub fn of(trace: &'a Trace<K>) -> Self {
        Self::new(trace.steps())
    }

    /// Step under the cursor; `None` only for an empty slice.
    pub fn current(&self) -> Option<&'a Step<K>> {
        self.steps.get(self.position)
    }

    /// Zero-based cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the cursor is on the first step.
    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    /// Whether the cursor is on the last step.
    pub fn at_end(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    /// Move one step forward. At the last step the cursor stays put and
    /// `None` is returned.
    pub fn forward(&mut self) -> Option<&'a Step<K>> {
        if self.at_end() {
            return None;
        }
        self.position += 1;
        self.current()
    }

    /// Move one step back. At the first step the cursor stays put and `None`
    /// is returned.
    pub fn back(&mut self) -> Option<&'a Step<K>> {
        if self.at_start() {
            return None;
        }
        self.position -= 1;
        self.current()
    }

    /// Jump to `position`; out-of-range positions leave the cursor unchanged.
    pub fn seek(&mut self, position: usize) -> Option<&'a Step<K>> {
        if position >= self.steps.len() {
            return None;
        }
        self.position = position;
        self.current()
    }

    /// Back to the first step.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Jump to the last step.
    pub fn fast_forward(&mut self) -> Option<&'a Step<K>> {
        self.seek(self.steps.len().saturating_sub(1))
    }

    /// Steps from the cursor to the end, advancing the cursor as they are consumed.
    pub fn remaining(&mut self) -> impl Iterator<Item = &'a Step<K>> + '_ {
        let start = self.position;
        let steps = self.steps;
        (start..steps.len()).map(move |idx| {
            self.position = idx;
            &steps[idx]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::AvlTree;
    use crate::StepKind;

    fn lr_trace() -> Trace<i32> {
        let mut tree = AvlTree::new();
        let _ = tree.insert(30);
        let _ = tree.insert(10);
        tree.insert(20)
    }

    #[test]
    fn test_forward_and_back_clamp() {
        let trace = lr_trace();
        let mut playback = Playback::of(&trace);
        assert_eq!(playback.len(), 4);
        assert!(playback.at_start());
        assert!(playback.back().is_none());

        let mut seen = 1;
        while playback.forward().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 4);
        assert!(playback.at_end());
        assert!(playback.forward().is_none());
        assert_eq!(playback.position(), 3);

        assert!(playback.back().is_some());
        assert_eq!(playback.position(), 2);
    }

    #[test]
    fn test_seek_and_remaining() {
        let trace = lr_trace();
        let mut playback = Playback::of(&trace);

        assert!(playback.seek(10).is_none());
        assert_eq!(playback.position(), 0);
        assert!(playback.seek(2).is_some());

        let rest: Vec<StepKind> = playback.remaining().map(Step::kind).collect();
        assert_eq!(rest.len(), 2);
        assert_eq!(playback.position(), 3);

        playback.rewind();
        assert_eq!(playback.current().map(Step::kind), trace.steps().first().map(Step::kind));
        assert_eq!(playback.fast_forward().map(Step::kind), trace.last().map(Step::kind));
    }

    #[test]
    fn test_empty_playback() {
        let mut playback = Playback::<i32>::new(&[]);
        assert!(playback.is_empty());
        assert!(playback.current().is_none());
        assert!(playback.forward().is_none());
        assert!(playback.fast_forward().is_none());
    }
}
