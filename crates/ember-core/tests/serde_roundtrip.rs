use ember_core::errors::{EmberError, ErrorInfo};
use ember_core::lattice::{LatticeDescriptor, LatticeType};

#[test]
fn descriptor_round_trip_json() {
    let descriptor = LatticeDescriptor::diagonal(LatticeType::SimpleCubic, [4, 5, 6]);
    let json = serde_json::to_string(&descriptor).expect("serialize");
    assert!(json.contains("\"SC_n3\""));
    assert!(json.contains("\"box\""));

    let decoded: LatticeDescriptor = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, descriptor);
    assert_eq!(decoded.box_shape().unwrap().extents(), [4, 5, 6]);
}

#[test]
fn descriptor_uses_only_the_box_diagonal() {
    let json = r#"{"latt_type":"BCC_n3","box":[[3.0,1.0,0.0],[0.0,2.0,0.0],[0.5,0.0,7.0]]}"#;
    let decoded: LatticeDescriptor = serde_json::from_str(json).expect("deserialize");
    assert_eq!(decoded.latt_type, LatticeType::BodyCentredCubic);
    assert_eq!(decoded.box_shape().unwrap().extents(), [3, 2, 7]);
}

#[test]
fn error_round_trip_json() {
    let err = EmberError::ProtocolViolation(
        ErrorInfo::new("stale-token", "token does not match").with_context("sequence", "3"),
    );
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"ProtocolViolation\""));
    let decoded: EmberError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
