use beam_errors::{EnableFlags, ErrorSpec, ErrorTable};

#[test]
fn error_table_roundtrips_through_json() {
    let table = ErrorTable::new()
        .bpm_gain(([1.0, 1.0], 1.0e-2))
        .bpm_tilt(2.0e-4)
        .shift_err(ErrorSpec::systematic([1.0e-4, 0.0]))
        .polynom_b_err(vec![0.0, 0.0, 5.0e-3]);
    let json = serde_json::to_string(&table).unwrap();
    let restored: ErrorTable = serde_json::from_str(&json).unwrap();
    assert_eq!(table, restored);
    // Unpopulated fields stay out of the payload.
    assert!(!json.contains("rotation_err"));
}

#[test]
fn enable_flags_roundtrip_through_json() {
    let flags = EnableFlags {
        shift_y: Some(false),
        polynom_b_index: Some(2),
        ..EnableFlags::none()
    };
    let json = serde_json::to_string(&flags).unwrap();
    let restored: EnableFlags = serde_json::from_str(&json).unwrap();
    assert_eq!(flags, restored);
}
