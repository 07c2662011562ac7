use gatebase_types::prelude::*;

#[test]
fn role_defaults_to_none_and_is_omitted() {
    let subject = Subject {
        kind: SubjectKind::User,
        subject_id: Id("u1".into()),
        display: "u1@example.com".into(),
        role: Role::None,
    };

    let json = serde_json::to_value(&subject).expect("serialize");
    assert_eq!(json["role"], serde_json::json!("none"));

    let parsed: Subject =
        serde_json::from_value(serde_json::json!({
            "kind": "User",
            "subject_id": "u1",
            "display": "u1@example.com"
        }))
        .expect("deserialize without role");
    assert!(parsed.role.is_none());
}

#[test]
fn admin_role_round_trips() {
    let json = serde_json::to_string(&Role::Admin).expect("serialize");
    assert_eq!(json, "\"admin\"");
    let parsed: Role = serde_json::from_str(&json).expect("deserialize");
    assert!(parsed.is_admin());
}
