use kbbq_error::{PlatformError, PlatformErrorKind};
use kbbq_social::{
    classify_code, INVALID_REQUEST_BODY, MISSING_ACCESS, MISSING_PERMISSIONS, UNKNOWN_CHANNEL,
    UNKNOWN_MEMBER, UNKNOWN_MESSAGE, UNKNOWN_ROLE, UNKNOWN_USER,
};

#[test]
fn test_absence_codes() {
    assert_eq!(classify_code(UNKNOWN_MEMBER, "Unknown Member"), PlatformErrorKind::UnknownMember);
    assert_eq!(classify_code(UNKNOWN_USER, "Unknown User"), PlatformErrorKind::UnknownMember);
    assert_eq!(classify_code(UNKNOWN_ROLE, "Unknown Role"), PlatformErrorKind::UnknownRole);
    assert_eq!(classify_code(UNKNOWN_CHANNEL, "Unknown Channel"), PlatformErrorKind::UnknownChannel);
    assert_eq!(classify_code(UNKNOWN_MESSAGE, "Unknown Message"), PlatformErrorKind::UnknownChannel);

    for code in [UNKNOWN_MEMBER, UNKNOWN_ROLE, UNKNOWN_CHANNEL] {
        assert!(PlatformError::new(classify_code(code, "")).is_expected_absence());
    }
}

#[test]
fn test_permission_codes_keep_message() {
    let kind = classify_code(MISSING_PERMISSIONS, "Missing Permissions");
    assert_eq!(kind, PlatformErrorKind::MissingPermissions("Missing Permissions".into()));
    assert!(PlatformError::new(kind).is_permission());
    assert!(PlatformError::new(classify_code(MISSING_ACCESS, "Missing Access")).is_permission());
}

#[test]
fn test_payload_and_other_codes() {
    assert_eq!(
        classify_code(INVALID_REQUEST_BODY, "Invalid Request Body"),
        PlatformErrorKind::InvalidPayload("Invalid Request Body".into())
    );
    assert_eq!(
        classify_code(30005, "Maximum number of guild roles reached"),
        PlatformErrorKind::Http("30005: Maximum number of guild roles reached".into())
    );
}
