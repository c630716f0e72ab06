//! Register geometry and the Hamiltonian terms it determines.
//!
//! Operations only see a register through [`RegisterGeometry`]. [`Register`]
//! is the reference implementation: atoms in the plane coupled by a van der
//! Waals interaction, with an optional local drive pattern.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rydra_ir::{Factor, Generator, OperatorBlock, OperatorTerm, PauliOp, QubitId, QubitSupport};

use crate::error::{AnalogError, AnalogResult};

/// Label of the interaction block in a generator.
pub const INTERACTION_LABEL: &str = "interaction";

/// Label of the pattern block in a generator.
pub const PATTERN_LABEL: &str = "pattern";

/// Default C6 coefficient in rad·µs⁻¹·µm⁶ (Rydberg level 60).
pub const DEFAULT_C6: f64 = 865_723.02;

/// What an analog operation needs from a register.
pub trait RegisterGeometry {
    /// Qubit indices of all nodes.
    fn nodes(&self) -> QubitSupport;

    /// The pairwise interaction Hamiltonian. Always present.
    fn interaction_hamiltonian(&self) -> Generator;

    /// The position-dependent pattern Hamiltonian, if one is configured.
    fn pattern_hamiltonian(&self) -> Option<Generator>;
}

/// Per-qubit weights for a global drive pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivePattern {
    /// Pattern amplitude.
    pub amplitude: f64,
    /// Pattern detuning.
    pub detuning: f64,
    /// Amplitude weight per qubit.
    pub amplitude_weights: Vec<f64>,
    /// Detuning weight per qubit.
    pub detuning_weights: Vec<f64>,
}

impl DrivePattern {
    /// A detuning-only pattern.
    pub fn detuning(detuning: f64, weights: Vec<f64>) -> Self {
        Self {
            amplitude: 0.0,
            detuning,
            amplitude_weights: vec![0.0; weights.len()],
            detuning_weights: weights,
        }
    }
}

/// Atoms at fixed positions in the plane.
///
/// Every instance has passed [`Register::validate`]; deserialization runs the
/// same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRegister")]
pub struct Register {
    coordinates: Vec<[f64; 2]>,
    c6: f64,
    pattern: Option<DrivePattern>,
}

/// Unvalidated wire form of a [`Register`].
#[derive(Deserialize)]
struct RawRegister {
    coordinates: Vec<[f64; 2]>,
    #[serde(default = "default_c6")]
    c6: f64,
    #[serde(default)]
    pattern: Option<DrivePattern>,
}

fn default_c6() -> f64 {
    DEFAULT_C6
}

impl TryFrom<RawRegister> for Register {
    type Error = AnalogError;

    fn try_from(raw: RawRegister) -> AnalogResult<Self> {
        let register = Self {
            coordinates: raw.coordinates,
            c6: raw.c6,
            pattern: raw.pattern,
        };
        register.validate()?;
        Ok(register)
    }
}

impl Register {
    /// Create a register from atom coordinates.
    pub fn from_coordinates(coordinates: Vec<[f64; 2]>) -> AnalogResult<Self> {
        let register = Self {
            coordinates,
            c6: DEFAULT_C6,
            pattern: None,
        };
        register.validate()?;
        Ok(register)
    }

    /// `n` atoms on a line, `spacing` µm apart.
    pub fn line(n: u32, spacing: f64) -> AnalogResult<Self> {
        Self::from_coordinates((0..n).map(|i| [f64::from(i) * spacing, 0.0]).collect())
    }

    /// `side × side` atoms on a square grid, `spacing` µm apart.
    pub fn square(side: u32, spacing: f64) -> AnalogResult<Self> {
        let coordinates = (0..side)
            .flat_map(|row| {
                (0..side).map(move |col| [f64::from(col) * spacing, f64::from(row) * spacing])
            })
            .collect();
        Self::from_coordinates(coordinates)
    }

    /// Attach a drive pattern.
    pub fn with_pattern(mut self, pattern: DrivePattern) -> AnalogResult<Self> {
        self.pattern = Some(pattern);
        self.validate()?;
        Ok(self)
    }

    /// Override the interaction coefficient.
    pub fn with_c6(mut self, c6: f64) -> AnalogResult<Self> {
        self.c6 = c6;
        self.validate()?;
        Ok(self)
    }

    /// Atom coordinates in µm; atom `i` is qubit `i`.
    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.coordinates
    }

    /// Interaction coefficient.
    pub fn c6(&self) -> f64 {
        self.c6
    }

    /// The drive pattern, if any.
    pub fn pattern(&self) -> Option<&DrivePattern> {
        self.pattern.as_ref()
    }

    /// Number of atoms.
    pub fn num_qubits(&self) -> usize {
        self.coordinates.len()
    }

    /// Distance between atoms `i` and `j` in µm.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let [xi, yi] = self.coordinates[i];
        let [xj, yj] = self.coordinates[j];
        (xi - xj).hypot(yi - yj)
    }

    /// Check geometry and pattern consistency.
    pub fn validate(&self) -> AnalogResult<()> {
        if !self.c6.is_finite() || self.c6 < 0.0 {
            return Err(AnalogError::Geometry(format!(
                "C6 must be a non-negative finite number, got {}",
                self.c6
            )));
        }
        if self.coordinates.iter().flatten().any(|c| !c.is_finite()) {
            return Err(AnalogError::Geometry("coordinates must be finite".to_string()));
        }
        for i in 0..self.num_qubits() {
            for j in (i + 1)..self.num_qubits() {
                if self.distance(i, j) == 0.0 {
                    return Err(AnalogError::Geometry(format!(
                        "atoms {i} and {j} occupy the same position"
                    )));
                }
            }
        }
        if let Some(pattern) = &self.pattern {
            let n = self.num_qubits();
            if pattern.amplitude_weights.len() != n || pattern.detuning_weights.len() != n {
                return Err(AnalogError::Geometry(format!(
                    "pattern weights must have one entry per qubit ({n}), \
                     got {} amplitude and {} detuning weights",
                    pattern.amplitude_weights.len(),
                    pattern.detuning_weights.len()
                )));
            }
        }
        Ok(())
    }
}

impl RegisterGeometry for Register {
    fn nodes(&self) -> QubitSupport {
        (0..self.num_qubits()).map(QubitId::from).collect()
    }

    /// `Σ_{i<j} C6 / r_ij⁶ · N(i) N(j)`.
    fn interaction_hamiltonian(&self) -> Generator {
        let mut terms = Vec::new();
        for i in 0..self.num_qubits() {
            for j in (i + 1)..self.num_qubits() {
                let strength = self.c6 / self.distance(i, j).powi(6);
                terms.push(OperatorTerm::product(
                    strength,
                    [
                        Factor {
                            op: PauliOp::N,
                            qubit: QubitId::from(i),
                        },
                        Factor {
                            op: PauliOp::N,
                            qubit: QubitId::from(j),
                        },
                    ],
                ));
            }
        }
        debug!("Interaction block with {} pair terms", terms.len());
        Generator::from_block(OperatorBlock::new(INTERACTION_LABEL, terms))
    }

    /// `(Ω_p / 2) Σ a_i X(i) − Δ_p Σ d_i N(i)`.
    fn pattern_hamiltonian(&self) -> Option<Generator> {
        let pattern = self.pattern.as_ref()?;
        let x_terms = pattern
            .amplitude_weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                OperatorTerm::single(pattern.amplitude / 2.0 * w, PauliOp::X, QubitId::from(i))
            });
        let n_terms = pattern
            .detuning_weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                OperatorTerm::single(-pattern.detuning * w, PauliOp::N, QubitId::from(i))
            });
        let terms = x_terms.chain(n_terms).collect();
        Some(Generator::from_block(OperatorBlock::new(PATTERN_LABEL, terms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_nodes() {
        let reg = Register::line(3, 5.0).unwrap();
        assert_eq!(reg.nodes(), QubitSupport::range(3));
        assert_eq!(reg.distance(0, 2), 10.0);
    }

    #[test]
    fn test_square_layout() {
        let reg = Register::square(2, 4.0).unwrap();
        assert_eq!(reg.num_qubits(), 4);
        assert!((reg.distance(0, 3) - 4.0 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_strength() {
        let reg = Register::line(2, 2.0).unwrap().with_c6(64.0).unwrap();
        let generator = reg.interaction_hamiltonian();
        let block = generator.block(INTERACTION_LABEL).unwrap();
        assert_eq!(block.terms.len(), 1);
        assert_eq!(block.terms[0].coefficient.as_f64(), Some(1.0));
        assert_eq!(block.terms[0].factors.len(), 2);
    }

    #[test]
    fn test_interaction_pairs() {
        let reg = Register::line(4, 5.0).unwrap();
        let generator = reg.interaction_hamiltonian();
        assert_eq!(generator.block(INTERACTION_LABEL).unwrap().terms.len(), 6);
    }

    #[test]
    fn test_no_pattern_by_default() {
        let reg = Register::line(2, 5.0).unwrap();
        assert!(reg.pattern_hamiltonian().is_none());
    }

    #[test]
    fn test_pattern_terms() {
        let reg = Register::line(2, 5.0)
            .unwrap()
            .with_pattern(DrivePattern::detuning(2.0, vec![1.0, 0.5]))
            .unwrap();
        let generator = reg.pattern_hamiltonian().unwrap();
        let block = generator.block(PATTERN_LABEL).unwrap();
        assert_eq!(block.terms.len(), 4);
        assert_eq!(block.terms[3].coefficient.as_f64(), Some(-1.0));
    }

    #[test]
    fn test_pattern_length_mismatch() {
        let err = Register::line(3, 5.0)
            .unwrap()
            .with_pattern(DrivePattern::detuning(1.0, vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, AnalogError::Geometry(_)));
    }

    #[test]
    fn test_coincident_atoms() {
        let err = Register::from_coordinates(vec![[1.0, 1.0], [1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, AnalogError::Geometry(_)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let reg: Register =
            serde_json::from_str(r#"{"coordinates": [[0.0, 0.0], [6.0, 0.0]]}"#).unwrap();
        assert_eq!(reg.c6(), DEFAULT_C6);
        assert!(reg.pattern().is_none());
        assert_eq!(reg, Register::line(2, 6.0).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_coincident_atoms() {
        let err = serde_json::from_str::<Register>(
            r#"{"coordinates": [[0.0, 0.0], [0.0, 0.0]], "c6": 1.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("same position"));
    }

    #[test]
    fn test_deserialize_rejects_oversized_pattern() {
        let json = r#"{
            "coordinates": [[0.0, 0.0], [5.0, 0.0]],
            "pattern": {
                "amplitude": 0.0,
                "detuning": 1.0,
                "amplitude_weights": [0.0, 0.0, 0.0],
                "detuning_weights": [1.0, 1.0, 1.0]
            }
        }"#;
        assert!(serde_json::from_str::<Register>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative_c6() {
        let json = r#"{"coordinates": [[0.0, 0.0], [5.0, 0.0]], "c6": -1.0}"#;
        assert!(serde_json::from_str::<Register>(json).is_err());
    }

    #[test]
    fn test_serde_round_trip_keeps_validity() {
        let reg = Register::square(2, 4.0)
            .unwrap()
            .with_pattern(DrivePattern::detuning(1.0, vec![1.0; 4]))
            .unwrap();
        let back: Register = serde_json::from_value(serde_json::to_value(&reg).unwrap()).unwrap();
        assert_eq!(back.coordinates(), reg.coordinates());
        assert_eq!(back.pattern(), reg.pattern());
    }
}
