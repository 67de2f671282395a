use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_from_value() {
    let id = UserId::new(42);
    assert_eq!(id.into_inner(), 42);
    assert_eq!(UserId::from(42), id);
}

#[test]
fn test_typed_id_display() {
    assert_eq!(format!("{}", UserId::new(7)), "7");
    assert_eq!(GroupId::new(-3).to_string(), "-3");
}

#[test]
fn test_typed_id_from_str() {
    assert_eq!(UserId::from_str("15").unwrap(), UserId::new(15));
    assert_eq!(UserId::from_str(" 15 ").unwrap(), UserId::new(15));
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(UserId::from_str("invalid").is_err());
    assert!(UserId::from_str("").is_err());
    assert!(UserId::from_str("1.5").is_err());
}

#[test]
fn test_typed_id_ordering() {
    let mut ids = vec![UserId::new(3), UserId::new(1), UserId::new(2)];
    ids.sort();
    assert_eq!(ids, vec![UserId::new(1), UserId::new(2), UserId::new(3)]);
}

#[test]
fn test_typed_id_serde_transparent() {
    let json = serde_json::to_string(&UserId::new(9)).unwrap();
    assert_eq!(json, "9");

    let id: GroupId = serde_json::from_str("12").unwrap();
    assert_eq!(id, GroupId::new(12));
}
