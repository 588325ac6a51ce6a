//! Tests for the user profile model.

use super::*;
use rstest::rstest;
use serde_json::json;

#[test]
fn minimal_profile_uses_backend_defaults() {
    let user: UserProfile =
        serde_json::from_value(json!({ "id": 7, "username": "ada" })).expect("profile decodes");

    assert!(user.email_notifications);
    assert!(!user.push_notifications);
    assert_eq!(user.notification_frequency, NotificationFrequency::Weekly);
    assert!(user.avatar.is_none());
    assert!(user.interests_list().is_empty());
}

#[test]
fn full_profile_decodes() {
    let user: UserProfile = serde_json::from_value(json!({
        "id": 7,
        "username": "ada",
        "email": "ada@example.com",
        "city": "Kazan",
        "interests": "jazz,theatre",
        "avatar": "http://localhost:8000/media/avatars/ada.png",
        "email_notifications": false,
        "push_notifications": true,
        "notification_frequency": "instant",
        "created_at": "2024-03-01T10:15:00.123456+03:00"
    }))
    .expect("profile decodes");

    assert_eq!(user.city, "Kazan");
    assert_eq!(user.notification_frequency, NotificationFrequency::Instant);
    assert_eq!(user.interests_list(), vec!["jazz", "theatre"]);
    assert!(user.created_at.is_some());
}

#[test]
fn profile_update_omits_untouched_fields() {
    let update = ProfileUpdate {
        city: Some("Samara".to_owned()),
        push_notifications: Some(true),
        ..ProfileUpdate::default()
    };

    let body = serde_json::to_value(&update).expect("update serialises");
    assert_eq!(body, json!({ "city": "Samara", "push_notifications": true }));
    assert!(!update.is_empty());
    assert!(ProfileUpdate::default().is_empty());
}

#[rstest]
#[case("", "image/png", vec![1], AvatarValidationError::EmptyFileName)]
#[case("a.txt", "text/plain", vec![1], AvatarValidationError::NotAnImage { content_type: "text/plain".to_owned() })]
#[case("a.png", "image/png", Vec::new(), AvatarValidationError::EmptyFile)]
fn rejects_invalid_avatars(
    #[case] file_name: &str,
    #[case] content_type: &str,
    #[case] bytes: Vec<u8>,
    #[case] expected: AvatarValidationError,
) {
    let err = AvatarUpload::try_new(file_name, content_type, bytes).expect_err("must fail");
    assert_eq!(err, expected);
}

#[test]
fn avatar_debug_omits_bytes() {
    let avatar = AvatarUpload::try_new("ada.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .expect("valid avatar");
    assert_eq!(
        format!("{avatar:?}"),
        r#"AvatarUpload { file_name: "ada.png", content_type: "image/png", len: 4 }"#
    );
}
