//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::Utc;
use schemars::schema_for;
use kb_core::actor::Actor;
use kb_core::audit_detail::{FieldChangedDetail, MissingTargetDetail, StatusChangedDetail};
use kb_core::credential::PasswordHash;
use kb_core::entities::*;
use kb_core::enums::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    request_roundtrip,
    Request,
    Request {
        id: "req-a3f8b2c1".into(),
        protocol: "2025000042".into(),
        title: "Email setup".into(),
        description: "configure account".into(),
        category_id: Some("cat-00000001".into()),
        sector_id: None,
        status: RequestStatus::InProgress,
        priority: Priority::High,
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        due_at: Some(Utc::now()),
        notes: Some("call back after lunch".into()),
    }
);

roundtrip_and_validate!(
    category_roundtrip,
    Category,
    Category {
        id: "cat-00000001".into(),
        name: "Support".into(),
        color: "#3B82F6".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    sector_roundtrip,
    Sector,
    Sector {
        id: "sec-00000001".into(),
        name: "Marketing".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    admin_user_roundtrip,
    User,
    User {
        id: "usr-00000001".into(),
        login: "admin".into(),
        display_name: "Administrator".into(),
        credential: PasswordHash::hash("admin").unwrap(),
        must_change_password: true,
        role: UserRole::Admin,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    regular_user_roundtrip,
    User,
    User {
        id: "usr-00000002".into(),
        login: "joao".into(),
        display_name: "João".into(),
        credential: PasswordHash::hash("pw").unwrap(),
        must_change_password: false,
        role: UserRole::regular("sec-00000001").unwrap(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-00000001".into(),
        request_id: "req-a3f8b2c1".into(),
        protocol: "2025000042".into(),
        actor_id: None,
        actor_name: Actor::SYSTEM_NAME.into(),
        action: AuditAction::Edit,
        field: Some("title".into()),
        previous_value: Some("Old".into()),
        new_value: Some("New".into()),
        detail: None,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    log_entry_roundtrip,
    LogEntry,
    LogEntry {
        id: "log-00000001".into(),
        timestamp: Utc::now(),
        level: LogLevel::Warn,
        category: "REQUEST".into(),
        message: "Attempt to update missing request".into(),
        details: Some(serde_json::json!({"id": "X"})),
        user_id: None,
        user_name: Some("System".into()),
        origin: Some(LogOrigin {
            ip: Some("127.0.0.1".into()),
            agent: Some("kb/0.1".into()),
        }),
    }
);

roundtrip_and_validate!(
    field_changed_detail_roundtrip,
    FieldChangedDetail,
    FieldChangedDetail {
        field: "priority".into(),
        previous: "low".into(),
        new: "high".into(),
    }
);

roundtrip_and_validate!(
    status_changed_detail_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: RequestStatus::Pending,
        to: RequestStatus::Completed,
    }
);

roundtrip_and_validate!(
    missing_target_detail_roundtrip,
    MissingTargetDetail,
    MissingTargetDetail {
        id: "X".into(),
        operation: "delete".into(),
    }
);

#[test]
fn overdue_ignores_completed_requests() {
    let past = Utc::now() - chrono::Duration::hours(1);
    let mut request = Request {
        id: "req-1".into(),
        protocol: "2025000001".into(),
        title: "t".into(),
        description: "d".into(),
        category_id: None,
        sector_id: None,
        status: RequestStatus::Pending,
        priority: Priority::Low,
        created_by: None,
        created_at: past,
        updated_at: past,
        due_at: Some(past),
        notes: None,
    };
    assert!(request.is_overdue(Utc::now()));
    request.status = RequestStatus::Completed;
    assert!(!request.is_overdue(Utc::now()));
    request.status = RequestStatus::Pending;
    request.due_at = None;
    assert!(!request.is_overdue(Utc::now()));
}
