//! Operator terms and additive Hamiltonian generators.
//!
//! A [`Generator`] is an ordered sum of terms. Local terms pair a symbolic
//! coefficient with a single-qubit operator; blocks carry externally computed
//! multi-qubit sums (interaction, pattern) that composition never looks into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::eval::substitute;
use crate::parameter::ParameterExpression;
use crate::qubit::QubitId;

/// Single-qubit operators available to generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Number operator `N = (I - Z) / 2`.
    N,
}

impl PauliOp {
    /// Get the name of this operator.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            PauliOp::X => "X",
            PauliOp::Y => "Y",
            PauliOp::N => "N",
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One operator acting on one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factor {
    /// The operator.
    pub op: PauliOp,
    /// The qubit it acts on.
    pub qubit: QubitId,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op, self.qubit.0)
    }
}

/// A coefficient times a product of single-qubit operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTerm {
    /// Symbolic weight.
    pub coefficient: ParameterExpression,
    /// Operator product; a single factor for local terms.
    pub factors: Vec<Factor>,
}

impl OperatorTerm {
    /// `coefficient · op(qubit)`.
    pub fn single(
        coefficient: impl Into<ParameterExpression>,
        op: PauliOp,
        qubit: QubitId,
    ) -> Self {
        Self {
            coefficient: coefficient.into(),
            factors: vec![Factor { op, qubit }],
        }
    }

    /// `coefficient · op_1(q_1) · op_2(q_2) · ...`.
    pub fn product(
        coefficient: impl Into<ParameterExpression>,
        factors: impl IntoIterator<Item = Factor>,
    ) -> Self {
        Self {
            coefficient: coefficient.into(),
            factors: factors.into_iter().collect(),
        }
    }

    /// Check if this term acts on a single qubit.
    pub fn is_local(&self) -> bool {
        self.factors.len() == 1
    }

    fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            coefficient: substitute(&self.coefficient, name, value),
            factors: self.factors.clone(),
        }
    }
}

impl fmt::Display for OperatorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coefficient)?;
        for factor in &self.factors {
            write!(f, " {factor}")?;
        }
        Ok(())
    }
}

/// A labelled sum of terms supplied from outside the composition step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorBlock {
    /// Name of the block, e.g. `"interaction"`.
    pub label: String,
    /// The summed terms.
    pub terms: Vec<OperatorTerm>,
}

impl OperatorBlock {
    /// Create a block.
    pub fn new(label: impl Into<String>, terms: Vec<OperatorTerm>) -> Self {
        Self {
            label: label.into(),
            terms,
        }
    }
}

/// One summand of a [`Generator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneratorTerm {
    /// Coefficient times a single-qubit operator.
    Local(OperatorTerm),
    /// Externally supplied block.
    Block(OperatorBlock),
}

impl GeneratorTerm {
    fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            GeneratorTerm::Local(term) => GeneratorTerm::Local(term.bind(name, value)),
            GeneratorTerm::Block(block) => GeneratorTerm::Block(OperatorBlock {
                label: block.label.clone(),
                terms: block.terms.iter().map(|t| t.bind(name, value)).collect(),
            }),
        }
    }

    fn operator_terms(&self) -> &[OperatorTerm] {
        match self {
            GeneratorTerm::Local(term) => std::slice::from_ref(term),
            GeneratorTerm::Block(block) => &block.terms,
        }
    }
}

/// An additive Hamiltonian generator.
///
/// Term order is kept for serialization only; it carries no physical meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    terms: Vec<GeneratorTerm>,
}

impl Generator {
    /// Create an empty generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator holding one block.
    pub fn from_block(block: OperatorBlock) -> Self {
        Self {
            terms: vec![GeneratorTerm::Block(block)],
        }
    }

    /// Append `coefficient · op(qubit)`.
    pub fn push_local(
        &mut self,
        coefficient: impl Into<ParameterExpression>,
        op: PauliOp,
        qubit: QubitId,
    ) {
        self.terms
            .push(GeneratorTerm::Local(OperatorTerm::single(coefficient, op, qubit)));
    }

    /// Append a block.
    pub fn push_block(&mut self, block: OperatorBlock) {
        self.terms.push(GeneratorTerm::Block(block));
    }

    /// Get the top-level terms.
    pub fn terms(&self) -> &[GeneratorTerm] {
        &self.terms
    }

    /// Number of top-level terms (a block counts once).
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Check if the generator has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate over the local terms only.
    pub fn local_terms(&self) -> impl Iterator<Item = &OperatorTerm> {
        self.terms.iter().filter_map(|t| match t {
            GeneratorTerm::Local(term) => Some(term),
            GeneratorTerm::Block(_) => None,
        })
    }

    /// Find a block by label.
    pub fn block(&self, label: &str) -> Option<&OperatorBlock> {
        self.terms.iter().find_map(|t| match t {
            GeneratorTerm::Block(block) if block.label == label => Some(block),
            _ => None,
        })
    }

    /// All qubits touched by any term, sorted.
    pub fn qubits(&self) -> BTreeSet<QubitId> {
        self.terms
            .iter()
            .flat_map(GeneratorTerm::operator_terms)
            .flat_map(|t| t.factors.iter().map(|f| f.qubit))
            .collect()
    }

    /// All free symbols in any coefficient, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        for term in self.terms.iter().flat_map(GeneratorTerm::operator_terms) {
            term.coefficient.collect_symbols(&mut set);
        }
        set
    }

    /// Substitute `value` for symbol `name` in every coefficient.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            terms: self.terms.iter().map(|t| t.bind(name, value)).collect(),
        }
    }
}

impl std::ops::Add for Generator {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.terms.extend(rhs.terms);
        self
    }
}

impl Extend<GeneratorTerm> for Generator {
    fn extend<I: IntoIterator<Item = GeneratorTerm>>(&mut self, iter: I) {
        self.terms.extend(iter);
    }
}

impl FromIterator<GeneratorTerm> for Generator {
    fn from_iter<I: IntoIterator<Item = GeneratorTerm>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match term {
                GeneratorTerm::Local(t) => write!(f, "{t}")?,
                GeneratorTerm::Block(b) => write!(f, "[{}: {} terms]", b.label, b.terms.len())?,
            }
        }
        Ok(())
    }
}
