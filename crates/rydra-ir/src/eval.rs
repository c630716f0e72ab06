//! Substitution and numeric evaluation of parameter expressions.
//!
//! These are plain tree walks kept apart from [`ParameterExpression`] itself:
//! building an expression never evaluates it, and evaluating never changes it.

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Numeric values for free symbols, keyed by symbol name.
pub type Bindings = FxHashMap<String, f64>;

/// Replace every occurrence of symbol `name` with the constant `value`.
pub fn substitute(expr: &ParameterExpression, name: &str, value: f64) -> ParameterExpression {
    use ParameterExpression as E;

    match expr {
        E::Symbol(n) if n == name => E::Constant(value),
        E::Constant(_) | E::Pi | E::Symbol(_) => expr.clone(),
        E::Neg(e) => E::Neg(boxed(e, name, value)),
        E::Sqrt(e) => E::Sqrt(boxed(e, name, value)),
        E::Sin(e) => E::Sin(boxed(e, name, value)),
        E::Cos(e) => E::Cos(boxed(e, name, value)),
        E::Add(a, b) => E::Add(boxed(a, name, value), boxed(b, name, value)),
        E::Sub(a, b) => E::Sub(boxed(a, name, value), boxed(b, name, value)),
        E::Mul(a, b) => E::Mul(boxed(a, name, value), boxed(b, name, value)),
        E::Div(a, b) => E::Div(boxed(a, name, value), boxed(b, name, value)),
        E::Pow(a, b) => E::Pow(boxed(a, name, value), boxed(b, name, value)),
    }
}

fn boxed(expr: &ParameterExpression, name: &str, value: f64) -> Box<ParameterExpression> {
    Box::new(substitute(expr, name, value))
}

/// Evaluate `expr` with the given symbol values.
///
/// Fails if a symbol has no binding, if a denominator evaluates to zero, or if
/// the result is not finite.
pub fn evaluate(expr: &ParameterExpression, bindings: &Bindings) -> IrResult<f64> {
    let value = eval_node(expr, bindings)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IrError::NonFinite(expr.to_string()))
    }
}

fn eval_node(expr: &ParameterExpression, bindings: &Bindings) -> IrResult<f64> {
    use ParameterExpression as E;

    Ok(match expr {
        E::Constant(v) => *v,
        E::Symbol(name) => *bindings
            .get(name)
            .ok_or_else(|| IrError::UnboundParameter(name.clone()))?,
        E::Pi => PI,
        E::Neg(e) => -eval_node(e, bindings)?,
        E::Sqrt(e) => eval_node(e, bindings)?.sqrt(),
        E::Sin(e) => eval_node(e, bindings)?.sin(),
        E::Cos(e) => eval_node(e, bindings)?.cos(),
        E::Add(a, b) => eval_node(a, bindings)? + eval_node(b, bindings)?,
        E::Sub(a, b) => eval_node(a, bindings)? - eval_node(b, bindings)?,
        E::Mul(a, b) => eval_node(a, bindings)? * eval_node(b, bindings)?,
        E::Div(a, b) => {
            let divisor = eval_node(b, bindings)?;
            if divisor == 0.0 {
                return Err(IrError::DivisionByZero {
                    numerator: a.to_string(),
                });
            }
            eval_node(a, bindings)? / divisor
        }
        E::Pow(a, b) => eval_node(a, bindings)?.powf(eval_node(b, bindings)?),
    })
}

/// Build a [`Bindings`] map from `(name, value)` pairs.
pub fn bindings<I, S>(pairs: I) -> Bindings
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
