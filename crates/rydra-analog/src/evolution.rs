//! The time-evolution primitive wrapped by every analog operation.

use serde::{Deserialize, Serialize};

use rydra_ir::{Generator, ParameterExpression};

/// `exp(-i · parameter · generator)`, held symbolically.
///
/// This type only records what an evolution consumes; applying it to a state
/// is done elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamEvo {
    generator: Generator,
    parameter: ParameterExpression,
}

impl HamEvo {
    /// Pair a generator with the (already scaled) evolution time.
    pub fn new(generator: Generator, parameter: ParameterExpression) -> Self {
        Self {
            generator,
            parameter,
        }
    }

    /// The Hamiltonian.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// The evolution time.
    pub fn parameter(&self) -> &ParameterExpression {
        &self.parameter
    }

    /// Substitute `value` for symbol `name` in generator and time.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            generator: self.generator.bind(name, value),
            parameter: rydra_ir::eval::substitute(&self.parameter, name, value),
        }
    }
}
