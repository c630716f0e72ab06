//! Symbolic parameter expressions for analog operations.
//!
//! Expressions are immutable trees. Every arithmetic operation returns a new
//! node and never touches its operands. Nothing is evaluated eagerly; see
//! [`crate::eval`] for substitution and numeric evaluation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

use crate::error::{IrError, IrResult};

/// A symbolic or concrete parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named free parameter.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Square root.
    Sqrt(Box<ParameterExpression>),
    /// Sine.
    Sin(Box<ParameterExpression>),
    /// Cosine.
    Cos(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division. Only built through [`ParameterExpression::checked_div`].
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Exponentiation.
    Pow(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// The literal constant zero.
    pub fn zero() -> Self {
        ParameterExpression::Constant(0.0)
    }

    /// Square root of this expression.
    #[must_use]
    pub fn sqrt(&self) -> Self {
        ParameterExpression::Sqrt(Box::new(self.clone()))
    }

    /// Sine of this expression.
    #[must_use]
    pub fn sin(&self) -> Self {
        ParameterExpression::Sin(Box::new(self.clone()))
    }

    /// Cosine of this expression.
    #[must_use]
    pub fn cos(&self) -> Self {
        ParameterExpression::Cos(Box::new(self.clone()))
    }

    /// Raise this expression to `exponent`.
    #[must_use]
    pub fn pow(&self, exponent: impl Into<ParameterExpression>) -> Self {
        ParameterExpression::Pow(Box::new(self.clone()), Box::new(exponent.into()))
    }

    /// Divide by `rhs`.
    ///
    /// Fails with [`IrError::DivisionByZero`] when the denominator folds to the
    /// constant zero. Symbolic denominators are accepted as-is; a zero that only
    /// appears after substitution is reported by [`crate::eval::evaluate`].
    pub fn checked_div(&self, rhs: impl Into<ParameterExpression>) -> IrResult<Self> {
        let rhs = rhs.into();
        if rhs.is_zero() == Some(true) {
            return Err(IrError::DivisionByZero {
                numerator: self.to_string(),
            });
        }
        Ok(ParameterExpression::Div(
            Box::new(self.clone()),
            Box::new(rhs),
        ))
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e)
            | ParameterExpression::Sqrt(e)
            | ParameterExpression::Sin(e)
            | ParameterExpression::Cos(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b)
            | ParameterExpression::Pow(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to fold this expression into a concrete `f64`.
    ///
    /// Returns `None` for symbolic expressions and for constant subtrees whose
    /// value is undefined (zero denominators, non-finite results).
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ParameterExpression::Constant(v) => *v,
            ParameterExpression::Symbol(_) => return None,
            ParameterExpression::Pi => PI,
            ParameterExpression::Neg(e) => -e.as_f64()?,
            ParameterExpression::Sqrt(e) => e.as_f64()?.sqrt(),
            ParameterExpression::Sin(e) => e.as_f64()?.sin(),
            ParameterExpression::Cos(e) => e.as_f64()?.cos(),
            ParameterExpression::Add(a, b) => a.as_f64()? + b.as_f64()?,
            ParameterExpression::Sub(a, b) => a.as_f64()? - b.as_f64()?,
            ParameterExpression::Mul(a, b) => a.as_f64()? * b.as_f64()?,
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                a.as_f64()? / divisor
            }
            ParameterExpression::Pow(a, b) => a.as_f64()?.powf(b.as_f64()?),
        };
        value.is_finite().then_some(value)
    }

    /// Zero test by constant folding.
    ///
    /// `Some(true)` / `Some(false)` only for expressions without symbols that
    /// fold to a finite value. Anything else is `None`: unknown, and must not be
    /// treated as either zero or nonzero.
    pub fn is_zero(&self) -> Option<bool> {
        if self.is_symbolic() {
            return None;
        }
        self.as_f64().map(|v| v == 0.0)
    }

    /// Get all symbol names in this expression, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    pub(crate) fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                set.insert(name.clone());
            }
            ParameterExpression::Neg(e)
            | ParameterExpression::Sqrt(e)
            | ParameterExpression::Sin(e)
            | ParameterExpression::Cos(e) => e.collect_symbols(set),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b)
            | ParameterExpression::Pow(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Simplify the expression by folding constant subexpressions.
    ///
    /// Undefined constant subtrees (e.g. a zero denominator after substitution)
    /// are left unfolded.
    #[must_use]
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        match self {
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.simplify())),
            ParameterExpression::Sqrt(e) => ParameterExpression::Sqrt(Box::new(e.simplify())),
            ParameterExpression::Sin(e) => ParameterExpression::Sin(Box::new(e.simplify())),
            ParameterExpression::Cos(e) => ParameterExpression::Cos(Box::new(e.simplify())),
            ParameterExpression::Add(a, b) => {
                ParameterExpression::Add(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Sub(a, b) => {
                ParameterExpression::Sub(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Mul(a, b) => {
                ParameterExpression::Mul(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Div(a, b) => {
                ParameterExpression::Div(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            ParameterExpression::Pow(a, b) => {
                ParameterExpression::Pow(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Sqrt(e) => write!(f, "sqrt({e})"),
            ParameterExpression::Sin(e) => write!(f, "sin({e})"),
            ParameterExpression::Cos(e) => write!(f, "cos({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
            ParameterExpression::Pow(a, b) => write!(f, "({a} ^ {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::Symbol(name.to_string())
    }
}

impl From<String> for ParameterExpression {
    fn from(name: String) -> Self {
        ParameterExpression::Symbol(name)
    }
}

impl From<&ParameterExpression> for ParameterExpression {
    fn from(expr: &ParameterExpression) -> Self {
        expr.clone()
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
