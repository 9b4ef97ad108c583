use kbbq_core::{GuildId, RoleId, UserId};

#[test]
fn test_default_ids_are_zero() {
    assert_eq!(UserId::default(), UserId(0));
    assert_eq!(GuildId::default().get(), 0);
    assert_eq!(RoleId::default().to_db(), 0);
}

#[test]
fn test_db_conversion_preserves_high_bits() {
    let id = UserId(u64::MAX - 7);
    assert!(id.to_db() < 0);
    assert_eq!(UserId::from_db(id.to_db()), id);
}
