//! Advisory visualization markers
//!
//! Markers only ever live on snapshot copies. The balancing code never reads
//! them; they tell a renderer which nodes a step is about.

use std::fmt;

use bitvec::prelude::*;

/// Role a node plays in one recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum Marker {
    /// Node a search is currently comparing against.
    Current,
    /// Node a search ended on.
    Found,
    /// Node created by the current insert.
    Inserted,
    /// Old subtree root of a rotation; it moves down.
    Pivot,
    /// Child of the pivot that becomes the new subtree root.
    Rising,
    /// Root of the inner grandchild subtree that changes parent in a rotation.
    Transferred,
    /// Node about to be removed.
    Deleting,
    /// In-order successor promoted into a two-child delete target.
    Successor,
}

impl Marker {
    /// Every marker, in bit order.
    pub const ALL: [Marker; 8] = [
        Marker::Current,
        Marker::Found,
        Marker::Inserted,
        Marker::Pivot,
        Marker::Rising,
        Marker::Transferred,
        Marker::Deleting,
        Marker::Successor,
    ];

    #[inline]
    fn bit(self) -> usize {
        self as usize
    }

    /// Lowercase name used in text output.
    pub fn name(self) -> &'static str {
        match self {
            Marker::Current => "current",
            Marker::Found => "found",
            Marker::Inserted => "inserted",
            Marker::Pivot => "pivot",
            Marker::Rising => "rising",
            Marker::Transferred => "transferred",
            Marker::Deleting => "deleting",
            Marker::Successor => "successor",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of markers attached to one snapshot node (one bit per marker).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    bits: BitArray<[u8; 1], Lsb0>,
}

impl Markers {
    /// No markers.
    pub fn empty() -> Self {
        Self {
            bits: BitArray::new([0u8]),
        }
    }

    /// Add a marker.
    pub fn insert(&mut self, marker: Marker) {
        self.bits.set(marker.bit(), true);
    }

    /// Remove a marker.
    pub fn remove(&mut self, marker: Marker) {
        self.bits.set(marker.bit(), false);
    }

    /// Whether `marker` is set.
    pub fn contains(&self, marker: Marker) -> bool {
        self.bits[marker.bit()]
    }

    /// Whether no marker is set.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Set markers in bit order.
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        Marker::ALL.into_iter().filter(|marker| self.contains(*marker))
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        let mut markers = Markers::empty();
        for marker in iter {
            markers.insert(marker);
        }
        markers
    }
}

impl fmt::Debug for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, marker) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{marker}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "visualize")]
impl serde::Serialize for Markers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
