//! Integration tests for analog operation construction.
//!
//! These tests build operations against both the reference register and a
//! hand-written geometry, and check generators and parameter maps
//! numerically.

use std::f64::consts::PI;

use rydra_analog::register::{INTERACTION_LABEL, PATTERN_LABEL};
use rydra_analog::{
    AnalogError, AnalogKind, AnalogOperation, DrivePattern, Register, RegisterGeometry,
};
use rydra_ir::eval::{Bindings, bindings, evaluate};
use rydra_ir::{
    Generator, GeneratorTerm, OperatorBlock, OperatorTerm, ParamRole, ParameterExpression,
    PauliOp, QubitId, QubitSupport,
};

/// Helper: evaluate a parameter-map entry with no free symbols.
fn param(op: &AnalogOperation, role: ParamRole) -> f64 {
    evaluate(op.parameters().get(role).unwrap(), &Bindings::default()).unwrap()
}

/// Helper: numeric coefficients of the local terms, as `(op, qubit, value)`.
fn local_values(generator: &Generator) -> Vec<(PauliOp, u32, f64)> {
    generator
        .local_terms()
        .map(|t| {
            let value = evaluate(&t.coefficient, &Bindings::default()).unwrap();
            (t.factors[0].op, t.factors[0].qubit.0, value)
        })
        .collect()
}

/// A geometry with fixed, recognisable blocks.
struct FixedGeometry {
    nodes: u32,
    pattern: bool,
}

impl RegisterGeometry for FixedGeometry {
    fn nodes(&self) -> QubitSupport {
        QubitSupport::range(self.nodes)
    }

    fn interaction_hamiltonian(&self) -> Generator {
        Generator::from_block(OperatorBlock::new(
            INTERACTION_LABEL,
            vec![OperatorTerm::single(7.0, PauliOp::N, QubitId(0))],
        ))
    }

    fn pattern_hamiltonian(&self) -> Option<Generator> {
        self.pattern.then(|| {
            Generator::from_block(OperatorBlock::new(
                PATTERN_LABEL,
                vec![OperatorTerm::single(-1.0, PauliOp::N, QubitId(1))],
            ))
        })
    }
}

// ============================================================================
// End-to-end drive
// ============================================================================

#[test]
fn test_drive_end_to_end_two_qubits() {
    let reg = FixedGeometry {
        nodes: 2,
        pattern: false,
    };
    let op = AnalogOperation::drive(1000.0, ParameterExpression::pi(), 0.0)
        .with_phase(0.0)
        .with_qubit_support([0u32, 1])
        .build(&reg)
        .unwrap();

    assert_eq!(op.kind(), AnalogKind::Drive);
    assert_eq!(op.name(), "AnalogDrive");

    // (π/2)[X(0) + X(1)], zero Y and N weights, then the interaction block
    let values = local_values(op.generator());
    assert_eq!(values.len(), 6);
    for (i, qubit) in [0u32, 1].into_iter().enumerate() {
        let (x_op, x_q, x) = values[3 * i];
        assert_eq!((x_op, x_q), (PauliOp::X, qubit));
        assert!((x - PI / 2.0).abs() < 1e-12);

        let (y_op, _, y) = values[3 * i + 1];
        assert_eq!(y_op, PauliOp::Y);
        assert_eq!(y, 0.0);

        let (n_op, _, n) = values[3 * i + 2];
        assert_eq!(n_op, PauliOp::N);
        assert_eq!(n, 0.0);
    }
    assert_eq!(
        op.generator().block(INTERACTION_LABEL),
        reg.interaction_hamiltonian().block(INTERACTION_LABEL)
    );

    // evolution time: 1000 / 1000
    assert_eq!(evaluate(op.parameter(), &Bindings::default()).unwrap(), 1.0);
    assert_eq!(param(&op, ParamRole::Parameter), 1.0);
    assert!((param(&op, ParamRole::HNorm) - PI).abs() < 1e-12);
    assert!((param(&op, ParamRole::Alpha) - PI).abs() < 1e-12);
}

#[test]
fn test_drive_symbolic_parameters_are_not_evaluated() {
    let reg = Register::line(2, 5.0).unwrap();
    let op = AnalogOperation::drive("t", "omega", "delta")
        .with_phase("phi")
        .build(&reg)
        .unwrap();

    for role in [
        ParamRole::Parameter,
        ParamRole::Duration,
        ParamRole::Alpha,
        ParamRole::Omega,
        ParamRole::Delta,
        ParamRole::Phase,
        ParamRole::HNorm,
    ] {
        assert!(op.parameters().get(role).unwrap().is_symbolic(), "{role}");
    }

    let values = bindings([("t", 250.0), ("omega", 6.0), ("delta", 8.0), ("phi", 0.3)]);
    let numeric = op.parameters().evaluate(&values).unwrap();
    assert!((numeric[&ParamRole::HNorm] - 10.0).abs() < 1e-12);
    assert!((numeric[&ParamRole::Alpha] - 2.5).abs() < 1e-12);
    assert!((numeric[&ParamRole::Parameter] - 0.25).abs() < 1e-12);
}

#[test]
fn test_drive_phase_signs() {
    let reg = FixedGeometry {
        nodes: 1,
        pattern: false,
    };
    let op = AnalogOperation::drive(1000.0, 2.0, 0.5)
        .with_phase(0.4)
        .build(&reg)
        .unwrap();

    let values = local_values(op.generator());
    assert!((values[0].2 - 0.4f64.cos()).abs() < 1e-12);
    assert!((values[1].2 + 0.4f64.sin()).abs() < 1e-12);
    assert_eq!(values[2].2, -0.5);
}

#[test]
fn test_invalid_drive_is_atomic() {
    let reg = Register::line(2, 5.0).unwrap();
    let result = AnalogOperation::drive("t", 0.0, 0.0).build(&reg);
    assert!(matches!(result, Err(AnalogError::InvalidDrive)));
}

// ============================================================================
// Rotations
// ============================================================================

#[test]
fn test_rx_and_rz_evolution_time() {
    let reg = Register::line(2, 5.0).unwrap();
    for theta in [0.1, 1.0, PI, 2.0 * PI] {
        let rx = AnalogOperation::rx(&reg, theta, None, true).unwrap();
        let rz = AnalogOperation::rz(&reg, theta, None, true).unwrap();
        assert!((param(&rx, ParamRole::Parameter) - theta / PI).abs() < 1e-12);
        assert!((param(&rz, ParamRole::Parameter) - theta / PI).abs() < 1e-12);
    }
}

#[test]
fn test_rz_normalizes_by_delta() {
    let reg = Register::line(1, 5.0).unwrap();
    let rz = AnalogOperation::rz(&reg, "theta", None, true).unwrap();

    // duration = theta / Δ · 1000 with Δ = π, Ω = 0
    let duration = rz.parameters().get(ParamRole::Duration).unwrap();
    assert!(format!("{duration}").contains("(theta / π)"));
    assert_eq!(param(&rz, ParamRole::Omega), 0.0);

    let values = local_values(&rz.generator().bind("theta", 1.0));
    // pure detuning: X and Y weights vanish, N weight is -π
    assert_eq!(values[0].2, 0.0);
    assert_eq!(values[2].2, -PI);
}

#[test]
fn test_ry_differs_from_rx_only_in_phase() {
    let reg = Register::line(3, 6.0).unwrap();
    let theta = 0.75;
    let rx = AnalogOperation::rx(&reg, theta, None, true).unwrap();
    let ry = AnalogOperation::ry(&reg, theta, None, true).unwrap();

    for role in [
        ParamRole::Parameter,
        ParamRole::Duration,
        ParamRole::Alpha,
        ParamRole::Omega,
        ParamRole::Delta,
        ParamRole::HNorm,
    ] {
        assert_eq!(param(&rx, role), param(&ry, role), "{role}");
    }
    assert_eq!(param(&rx, ParamRole::Phase), 0.0);
    assert_eq!(param(&ry, ParamRole::Phase), -PI / 2.0);
}

#[test]
fn test_rotation_alpha_matches_angle() {
    let reg = Register::line(2, 5.0).unwrap();
    for op in [
        AnalogOperation::rx(&reg, 1.1, None, true).unwrap(),
        AnalogOperation::ry(&reg, 1.1, None, true).unwrap(),
        AnalogOperation::rz(&reg, 1.1, None, true).unwrap(),
    ] {
        let angle = op.rotation_angle().unwrap().as_f64().unwrap();
        assert_eq!(angle, 1.1);
        assert!((param(&op, ParamRole::Alpha) - angle).abs() < 1e-12);
    }
}

#[test]
fn test_rotation_on_partial_support() {
    let reg = Register::line(4, 5.0).unwrap();
    let op = AnalogOperation::rx(&reg, PI, Some(QubitSupport::from([1u32, 3])), false).unwrap();
    let qubits: Vec<u32> = op
        .generator()
        .local_terms()
        .map(|t| t.factors[0].qubit.0)
        .collect();
    assert_eq!(qubits, vec![1, 1, 1, 3, 3, 3]);
    // interaction still spans the whole register
    assert_eq!(op.generator().qubits().len(), 4);
}

// ============================================================================
// Pattern handling
// ============================================================================

#[test]
fn test_absent_pattern_never_changes_generator() {
    let reg = FixedGeometry {
        nodes: 2,
        pattern: false,
    };
    let with = AnalogOperation::drive(1.0, 1.0, 0.0)
        .with_pattern(true)
        .build(&reg)
        .unwrap();
    let without = AnalogOperation::drive(1.0, 1.0, 0.0)
        .with_pattern(false)
        .build(&reg)
        .unwrap();
    assert_eq!(with.generator(), without.generator());
    assert!(with.add_pattern());
    assert!(!without.add_pattern());
}

#[test]
fn test_interaction_without_pattern_is_interaction_term() {
    for pattern in [false, true] {
        let reg = FixedGeometry { nodes: 2, pattern };
        let op = AnalogOperation::interaction(&reg, 500.0, false).unwrap();
        assert_eq!(op.generator(), &reg.interaction_hamiltonian());
    }
}

#[test]
fn test_interaction_with_pattern() {
    let reg = Register::line(2, 5.0)
        .unwrap()
        .with_pattern(DrivePattern::detuning(1.5, vec![1.0, 0.0]))
        .unwrap();
    let op = AnalogOperation::interaction(&reg, 500.0, true).unwrap();
    let terms = op.generator().terms();
    assert_eq!(terms.len(), 2);
    assert!(matches!(&terms[0], GeneratorTerm::Block(b) if b.label == INTERACTION_LABEL));
    assert!(matches!(&terms[1], GeneratorTerm::Block(b) if b.label == PATTERN_LABEL));
    assert_eq!(param(&op, ParamRole::Parameter), 0.5);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_operations_build_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AnalogOperation>();
    assert_send_sync::<Register>();

    let reg = Register::square(2, 5.0).unwrap();
    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let reg = reg.clone();
            std::thread::spawn(move || {
                AnalogOperation::rx(&reg, f64::from(i), None, true)
                    .map(|op| op.generator().num_terms())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 4 * 3 + 1);
    }
}

#[test]
fn test_operation_serializes() {
    let reg = Register::line(2, 5.0).unwrap();
    let op = AnalogOperation::ry(&reg, "theta", None, true).unwrap();
    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(json["kind"], "Ry");
    assert!(json["parameters"].get("h_norm").is_some());
    let back: AnalogOperation = serde_json::from_value(json).unwrap();
    assert_eq!(back.kind(), op.kind());
    assert_eq!(back.parameters(), op.parameters());
    assert_eq!(back.qubit_support(), op.qubit_support());
    assert_eq!(back.rotation_angle(), op.rotation_angle());

    let bound = op.bind("theta", PI);
    let json = serde_json::to_string(&bound).unwrap();
    let back: AnalogOperation = serde_json::from_str(&json).unwrap();
    assert_eq!(back.parameter(), bound.parameter());
}

/// Serialize a valid drive, let `forge` tamper with the JSON, and try to
/// read it back.
fn read_forged(forge: impl FnOnce(&mut serde_json::Value)) -> Result<AnalogOperation, String> {
    let reg = Register::line(2, 5.0).unwrap();
    let op = AnalogOperation::drive(1000.0, 1.0, 0.5).build(&reg).unwrap();
    let mut json = serde_json::to_value(&op).unwrap();
    forge(&mut json);
    serde_json::from_value(json).map_err(|e| e.to_string())
}

#[test]
fn test_deserialize_rejects_incomplete_parameters() {
    let err = read_forged(|json| {
        let omega = json["parameters"]["omega"].clone();
        json["parameters"] = serde_json::json!({ "omega": omega });
    })
    .unwrap_err();
    assert!(err.contains("missing parameter"), "{err}");

    let err = read_forged(|json| {
        let parameters = json["parameters"].as_object_mut().unwrap();
        parameters.remove("h_norm");
    })
    .unwrap_err();
    assert!(err.contains("h_norm"), "{err}");
}

#[test]
fn test_deserialize_rejects_zero_drive() {
    let zero = serde_json::to_value(ParameterExpression::zero()).unwrap();
    let err = read_forged(|json| {
        json["parameters"]["omega"] = zero.clone();
        json["parameters"]["delta"] = zero;
    })
    .unwrap_err();
    assert!(err.contains("cannot both be 0"), "{err}");
}

#[test]
fn test_deserialize_rejects_mismatched_parameter() {
    let other = serde_json::to_value(ParameterExpression::constant(5.0)).unwrap();
    let err = read_forged(|json| json["parameters"]["parameter"] = other).unwrap_err();
    assert!(err.contains("does not match evolution"), "{err}");

    let err = read_forged(|json| {
        let forged = serde_json::to_value(ParameterExpression::constant(7.0)).unwrap();
        json["parameters"]["parameter"] = forged.clone();
        json["evolution"]["parameter"] = forged;
    })
    .unwrap_err();
    assert!(err.contains("does not match duration"), "{err}");
}

#[test]
fn test_deserialize_rejects_stray_rotation_angle() {
    let angle = serde_json::to_value(ParameterExpression::symbol("theta")).unwrap();
    let err = read_forged(|json| json["rotation_angle"] = angle).unwrap_err();
    assert!(err.contains("rotation angle"), "{err}");

    let err = read_forged(|json| json["kind"] = "Interaction".into()).unwrap_err();
    assert!(err.contains("takes 2 parameters"), "{err}");
}

#[test]
fn test_deserialize_accepts_untouched_json() {
    assert!(read_forged(|_| {}).is_ok());
}
