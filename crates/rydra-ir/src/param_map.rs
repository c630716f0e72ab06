//! Named parameter records attached to analog operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};
use crate::eval::{Bindings, evaluate, substitute};
use crate::parameter::ParameterExpression;

/// The physically meaningful quantities an operation can expose.
///
/// Ordering follows declaration order and fixes iteration order of a
/// [`ParamMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// Scaled duration handed to the time-evolution primitive.
    Parameter,
    /// Requested duration.
    Duration,
    /// Rotation angle realized by the drive, `duration · h_norm / 1000`.
    Alpha,
    /// Drive amplitude.
    Omega,
    /// Detuning.
    Delta,
    /// Drive phase.
    Phase,
    /// Drive norm, `sqrt(omega² + delta²)`.
    HNorm,
}

impl ParamRole {
    /// All roles in iteration order.
    pub const ALL: [ParamRole; 7] = [
        ParamRole::Parameter,
        ParamRole::Duration,
        ParamRole::Alpha,
        ParamRole::Omega,
        ParamRole::Delta,
        ParamRole::Phase,
        ParamRole::HNorm,
    ];

    /// Get the role name.
    pub fn name(&self) -> &'static str {
        match self {
            ParamRole::Parameter => "parameter",
            ParamRole::Duration => "duration",
            ParamRole::Alpha => "alpha",
            ParamRole::Omega => "omega",
            ParamRole::Delta => "delta",
            ParamRole::Phase => "phase",
            ParamRole::HNorm => "h_norm",
        }
    }
}

impl fmt::Display for ParamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ParamRole {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamRole::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| IrError::UnknownRole(s.to_string()))
    }
}

/// An immutable mapping from roles to expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    entries: BTreeMap<ParamRole, ParameterExpression>,
}

impl ParamMap {
    /// Build a map from `(role, expression)` pairs. Later pairs win.
    pub fn new(entries: impl IntoIterator<Item = (ParamRole, ParameterExpression)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Get the expression bound to `role`.
    pub fn get(&self, role: ParamRole) -> IrResult<&ParameterExpression> {
        self.entries
            .get(&role)
            .ok_or_else(|| IrError::MissingRole(role.name().to_string()))
    }

    /// Get the expression bound to the role called `name`.
    pub fn get_by_name(&self, name: &str) -> IrResult<&ParameterExpression> {
        self.get(name.parse()?)
    }

    /// Check if `role` is set.
    pub fn contains(&self, role: ParamRole) -> bool {
        self.entries.contains_key(&role)
    }

    /// Roles present in this map, in role order.
    pub fn roles(&self) -> impl Iterator<Item = ParamRole> + '_ {
        self.entries.keys().copied()
    }

    /// Iterate over `(role, expression)` pairs in role order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamRole, &ParameterExpression)> {
        self.entries.iter().map(|(role, expr)| (*role, expr))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new map with `value` substituted for symbol `name` in every entry.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.iter()
            .map(|(role, expr)| (role, substitute(expr, name, value)))
            .collect()
    }

    /// Evaluate every entry numerically.
    pub fn evaluate(&self, bindings: &Bindings) -> IrResult<BTreeMap<ParamRole, f64>> {
        self.iter()
            .map(|(role, expr)| Ok((role, evaluate(expr, bindings)?)))
            .collect()
    }
}

impl FromIterator<(ParamRole, ParameterExpression)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (ParamRole, ParameterExpression)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for ParamMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (role, expr) in self.iter() {
            writeln!(f, "{role:>9} = {expr}")?;
        }
        Ok(())
    }
}
