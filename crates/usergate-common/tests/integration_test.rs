use chrono::{TimeZone, Utc};
use serde_json::json;
use usergate_common::models::account::{LoginUser, PublicAccount};
use usergate_common::models::auth::Claims;
use uuid::Uuid;

fn sample_account() -> PublicAccount {
    PublicAccount {
        id: Uuid::nil(),
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
    }
}

#[test]
fn test_public_account_serializes_without_credentials() {
    let value = serde_json::to_value(sample_account()).unwrap();
    let obj = value.as_object().unwrap();

    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["created_at", "email", "id", "name", "updated_at"]);
    assert_eq!(value["email"], "ana@x.com");
}

#[test]
fn test_login_user_from_account() {
    let user = LoginUser::from(&sample_account());
    assert_eq!(
        serde_json::to_value(user).unwrap(),
        json!({"name": "Ana", "email": "ana@x.com"})
    );
}

#[test]
fn test_claims_roundtrip_shape() {
    let claims: Claims = serde_json::from_value(json!({
        "sub": "00000000-0000-0000-0000-000000000000",
        "iat": 1_700_000_000,
        "exp": 1_700_086_400,
    }))
    .unwrap();
    assert_eq!(claims.exp - claims.iat, 86_400);
}
