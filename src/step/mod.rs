//! Recorded animation steps
//!
//! Every public tree operation produces a [`Trace`]: the operation, its
//! outcome and an ordered list of [`Step`]s. Each step is immutable and owns
//! deep snapshots, so a trace stays valid no matter what happens to the tree
//! afterwards.

mod recorder;

pub(crate) use recorder::StepRecorder;

use std::fmt;

use crate::snapshot::Snapshot;
use crate::tree::Direction;

/// Imbalance shape that triggered a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RotationCase {
    /// Left-left: single right rotation.
    LL,
    /// Right-right: single left rotation.
    RR,
    /// Left-right: left rotation on the left child, then right rotation.
    LR,
    /// Right-left: right rotation on the right child, then left rotation.
    RL,
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationCase::LL => "LL",
            RotationCase::RR => "RR",
            RotationCase::LR => "LR",
            RotationCase::RL => "RL",
        };
        f.write_str(name)
    }
}

/// Direction of a single rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum RotationDirection {
    /// The left child rises.
    Right,
    /// The right child rises.
    Left,
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationDirection::Right => f.write_str("right"),
            RotationDirection::Left => f.write_str("left"),
        }
    }
}

/// Which half of a rotation event a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(rename_all = "kebab-case"))]
pub enum RotationPhase {
    /// Tree before the rotation with the moving nodes marked.
    InProgress,
    /// Tree before and after the rotation.
    Complete,
}

impl fmt::Display for RotationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationPhase::InProgress => f.write_str("in-progress"),
            RotationPhase::Complete => f.write_str("complete"),
        }
    }
}

/// Category of a recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(tag = "type", rename_all = "kebab-case"))]
pub enum StepKind {
    /// Tree before the operation started.
    Initial,
    /// Plain BST insertion before any rebalancing.
    Preview,
    /// New node placed without any rotation.
    Placed,
    /// Insert of a key that is already present.
    Duplicate,
    /// Half of a single rotation event.
    Rotation {
        /// Imbalance shape being repaired.
        case: RotationCase,
        /// Direction of this single rotation.
        direction: RotationDirection,
        /// In progress or complete.
        phase: RotationPhase,
    },
    /// Search compared the target with a node; `towards` is `None` on a match.
    SearchCompare {
        /// Child the search continues into.
        towards: Option<Direction>,
    },
    /// Search ended on the target.
    SearchFound,
    /// Search fell off the tree.
    SearchNotFound,
    /// Delete located its target.
    DeleteFound,
    /// Two-child target is about to take its in-order successor's key.
    DeleteSuccessor,
    /// Node spliced out of the tree.
    DeleteExcised,
    /// Delete of a key that is not present.
    DeleteMissing,
    /// Tree after the operation finished.
    Final,
}

impl StepKind {
    /// Whether this is a rotation step.
    pub fn is_rotation(&self) -> bool {
        matches!(self, StepKind::Rotation { .. })
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Initial => f.write_str("initial"),
            StepKind::Preview => f.write_str("preview"),
            StepKind::Placed => f.write_str("placed"),
            StepKind::Duplicate => f.write_str("duplicate"),
            StepKind::Rotation {
                case,
                direction,
                phase,
            } => write!(f, "{case} rotate-{direction} {phase}"),
            StepKind::SearchCompare { towards: Some(dir) } => write!(f, "compare go-{dir}"),
            StepKind::SearchCompare { towards: None } => f.write_str("compare match"),
            StepKind::SearchFound => f.write_str("found"),
            StepKind::SearchNotFound => f.write_str("not-found"),
            StepKind::DeleteFound => f.write_str("delete-target"),
            StepKind::DeleteSuccessor => f.write_str("successor"),
            StepKind::DeleteExcised => f.write_str("excised"),
            StepKind::DeleteMissing => f.write_str("missing"),
            StepKind::Final => f.write_str("final"),
        }
    }
}

/// One recorded unit of an animation trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Step<K> {
    label: String,
    kind: StepKind,
    #[cfg_attr(feature = "visualize", serde(skip_serializing_if = "Option::is_none"))]
    before: Option<Snapshot<K>>,
    after: Snapshot<K>,
}

impl<K> Step<K> {
    /// Step with a single snapshot.
    pub(crate) fn single(label: String, kind: StepKind, after: Snapshot<K>) -> Self {
        Self {
            label,
            kind,
            before: None,
            after,
        }
    }

    /// Step showing a transition from `before` to `after`.
    pub(crate) fn transition(
        label: String,
        kind: StepKind,
        before: Snapshot<K>,
        after: Snapshot<K>,
    ) -> Self {
        Self {
            label,
            kind,
            before: Some(before),
            after,
        }
    }

    /// Human-readable description.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Category tag.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Tree before the change, for transition steps.
    pub fn before(&self) -> Option<&Snapshot<K>> {
        self.before.as_ref()
    }

    /// Tree at (or after) this step.
    pub fn after(&self) -> &Snapshot<K> {
        &self.after
    }
}

impl<K: fmt::Display> fmt::Display for Step<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} [{}]", self.label, self.kind)?;
        if let Some(before) = &self.before {
            writeln!(f, "-- before")?;
            write!(f, "{before}")?;
            writeln!(f, "-- after")?;
        }
        write!(f, "{}", self.after)
    }
}

/// Public operation a trace belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(tag = "op", content = "key", rename_all = "lowercase"))]
pub enum Operation<K> {
    /// `insert(key)`
    Insert(K),
    /// `delete(key)`
    Delete(K),
    /// `search_with_trace(key)`
    Search(K),
}

impl<K> Operation<K> {
    /// Key the operation was called with.
    pub fn key(&self) -> &K {
        match self {
            Operation::Insert(key) | Operation::Delete(key) | Operation::Search(key) => key,
        }
    }

    /// Verb used in labels.
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Insert(_) => "insert",
            Operation::Delete(_) => "delete",
            Operation::Search(_) => "search",
        }
    }
}

impl<K: fmt::Display> fmt::Display for Operation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb(), self.key())
    }
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(rename_all = "kebab-case"))]
pub enum Outcome {
    /// Key added.
    Inserted,
    /// Key already present; tree unchanged.
    Duplicate,
    /// Key removed.
    Deleted,
    /// Key not present; tree unchanged.
    Absent,
    /// Search reached the key.
    Found,
    /// Search did not reach the key.
    NotFound,
}

impl Outcome {
    /// Whether the live tree changed.
    pub fn mutated(self) -> bool {
        matches!(self, Outcome::Inserted | Outcome::Deleted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Inserted => "inserted",
            Outcome::Duplicate => "duplicate",
            Outcome::Deleted => "deleted",
            Outcome::Absent => "absent",
            Outcome::Found => "found",
            Outcome::NotFound => "not-found",
        };
        f.write_str(name)
    }
}

/// Complete, self-contained record of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[must_use = "a trace is the only record of the steps an operation took"]
pub struct Trace<K> {
    operation: Operation<K>,
    outcome: Outcome,
    steps: Vec<Step<K>>,
}

impl<K> Trace<K> {
    pub(crate) fn new(operation: Operation<K>, outcome: Outcome, steps: Vec<Step<K>>) -> Self {
        Self {
            operation,
            outcome,
            steps,
        }
    }

    /// Operation that produced the trace.
    pub fn operation(&self) -> &Operation<K> {
        &self.operation
    }

    /// How the operation ended.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Steps in emission order.
    pub fn steps(&self) -> &[Step<K>] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for traces produced by the tree; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Completed single rotations, in order.
    pub fn rotations(&self) -> impl Iterator<Item = (RotationCase, RotationDirection)> + '_ {
        self.steps.iter().filter_map(|step| match step.kind {
            StepKind::Rotation {
                case,
                direction,
                phase: RotationPhase::Complete,
            } => Some((case, direction)),
            _ => None,
        })
    }

    /// Number of completed single rotations.
    pub fn rotation_count(&self) -> usize {
        self.rotations().count()
    }

    /// Steps of the given kind.
    pub fn steps_of(&self, kind: StepKind) -> impl Iterator<Item = &Step<K>> + '_ {
        self.steps.iter().filter(move |step| step.kind == kind)
    }

    /// Last step.
    pub fn last(&self) -> Option<&Step<K>> {
        self.steps.last()
    }
}

impl<K: fmt::Display> fmt::Display for Trace<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} -> {}", self.operation, self.outcome)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
