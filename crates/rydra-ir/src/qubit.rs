//! Qubit identifiers and qubit supports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit (a node of the register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// The ordered set of qubits an operation acts on.
///
/// Order only affects the order in which generator terms are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitSupport(Vec<QubitId>);

impl QubitSupport {
    /// Build a support from qubit ids, dropping repeated ids.
    pub fn new(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let mut ids: Vec<QubitId> = Vec::new();
        for q in qubits {
            if !ids.contains(&q) {
                ids.push(q);
            }
        }
        Self(ids)
    }

    /// Support over qubits `0..n`.
    pub fn range(n: u32) -> Self {
        Self((0..n).map(QubitId).collect())
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the support has no qubits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.0.contains(&qubit)
    }

    /// Iterate over the qubits in order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.0.iter().copied()
    }

    /// The qubits as a slice.
    pub fn as_slice(&self) -> &[QubitId] {
        &self.0
    }
}

impl FromIterator<QubitId> for QubitSupport {
    fn from_iter<I: IntoIterator<Item = QubitId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<u32>> for QubitSupport {
    fn from(ids: Vec<u32>) -> Self {
        Self::new(ids.into_iter().map(QubitId))
    }
}

impl<const N: usize> From<[u32; N]> for QubitSupport {
    fn from(ids: [u32; N]) -> Self {
        Self::new(ids.into_iter().map(QubitId))
    }
}

impl fmt::Display for QubitSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, q) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        write!(f, ")")
    }
}
