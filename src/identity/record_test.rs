use super::*;

#[test]
fn user_id_accepts_integer_float_and_string() {
    let from_int: UserId = serde_json::from_str("7").unwrap();
    let from_float: UserId = serde_json::from_str("7.0").unwrap();
    let from_string: UserId = serde_json::from_str("\"7\"").unwrap();
    assert_eq!(from_int, UserId(7));
    assert_eq!(from_float, from_int);
    assert_eq!(from_string, from_int);
}

#[test]
fn user_id_rejects_non_numeric() {
    assert!(serde_json::from_str::<UserId>("\"seven\"").is_err());
    assert!(serde_json::from_str::<UserId>("7.5").is_err());
    assert!(serde_json::from_str::<UserId>("true").is_err());
}

#[test]
fn user_id_rejects_floats_outside_i64() {
    assert!(serde_json::from_str::<UserId>("9223372036854775808.0").is_err());
    assert!(serde_json::from_str::<UserId>("1e19").is_err());
    let min: UserId = serde_json::from_str("-9223372036854775808.0").unwrap();
    assert_eq!(min, UserId(i64::MIN));
}

#[test]
fn user_id_serializes_as_number() {
    assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
}

#[test]
fn role_uses_wire_strings() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ROLE_ADMIN\"");
    assert_eq!("ROLE_USER".parse::<Role>().unwrap(), Role::User);
    assert!("ROLE_MODERATOR".parse::<Role>().is_err());
    assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
}

#[test]
fn login_payload_parses_with_extra_fields() {
    let json = r#"{"userId": 7, "username": "alice", "role": "ROLE_USER", "token": "ignored"}"#;
    let record: IdentityRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record, IdentityRecord::new(UserId(7), "alice", Role::User).unwrap());
}

#[test]
fn login_payload_missing_field_is_rejected() {
    let json = r#"{"role": "ROLE_ADMIN"}"#;
    assert!(serde_json::from_str::<IdentityRecord>(json).is_err());
    let json = r#"{"userId": 1, "role": "ROLE_ADMIN"}"#;
    assert!(serde_json::from_str::<IdentityRecord>(json).is_err());
}

#[test]
fn blank_username_is_rejected() {
    assert!(IdentityRecord::new(UserId(1), "   ", Role::User).is_err());
    let json = r#"{"userId": 1, "username": "", "role": "ROLE_USER"}"#;
    assert!(serde_json::from_str::<IdentityRecord>(json).is_err());
}
