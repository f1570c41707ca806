use ember_core::errors::{EmberError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("kind", "spin_flip_3d")
        .with_context("reason", "example")
}

#[test]
fn unsupported_move_kind_surface() {
    let err = EmberError::UnsupportedMoveKind(sample_info("unknown-move", "not supported"));
    assert_eq!(err.info().code, "unknown-move");
    assert!(err.info().context.contains_key("kind"));
}

#[test]
fn lattice_mismatch_surface() {
    let err = EmberError::LatticeMismatch(sample_info("lattice-mismatch", "wrong lattice"));
    assert_eq!(err.info().code, "lattice-mismatch");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn protocol_violation_surface() {
    let err = EmberError::ProtocolViolation(sample_info("no-pending-move", "nothing proposed"));
    assert_eq!(err.info().code, "no-pending-move");
}

#[test]
fn hamiltonian_shape_surface() {
    let err = EmberError::InvalidHamiltonianShape(sample_info("dui-length", "short dui"));
    assert_eq!(err.info().code, "dui-length");
}

#[test]
fn display_includes_context_and_hint() {
    let err = EmberError::Config(
        ErrorInfo::new("invalid-weight", "weights must be positive")
            .with_context("kind", "spin_flip_3d")
            .with_hint("use a positive finite weight"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: weights must be positive"));
    assert!(rendered.contains("kind=spin_flip_3d"));
    assert!(rendered.contains("hint: use a positive finite weight"));
}
