use serde_json::{json, Value};

use timekeeper::models::{
    CategoryCreateOrUpdate, EmailRequest, ItemQuery, PaginatedResponse, TokenResponse,
    TrackingItem, TrackingItemCreate, TrackingItemUpdate, VerifyOtp,
};
use timekeeper::ClientError;

fn create(title: &str, category_id: i64, reminder_date: &str) -> TrackingItemCreate {
    TrackingItemCreate {
        title: title.to_string(),
        category_id,
        reminder_date: reminder_date.to_string(),
        description: None,
    }
}

#[test]
fn test_tracking_item_without_category() {
    let item: TrackingItem = serde_json::from_value(json!({
        "id": 4,
        "user_id": 2,
        "title": "Car insurance",
        "category_id": 3,
        "reminder_date": "2026-11-30",
        "description": null,
        "is_done": false,
        "created_at": "2025-10-01T08:30:00"
    }))
    .unwrap();

    assert_eq!(item.category_id, 3);
    assert!(item.category.is_none());
    assert!(item.description.is_none());

    // Absent expansion stays absent on the way back out
    let value = serde_json::to_value(&item).unwrap();
    assert!(value.get("category").is_none());
}

#[test]
fn test_tracking_item_with_embedded_category() {
    let item: TrackingItem = serde_json::from_value(json!({
        "id": 4,
        "user_id": 2,
        "title": "Car insurance",
        "category_id": 3,
        "category": {
            "id": 3,
            "name": "Insurance",
            "is_predefined": true,
            "user_id": null,
            "created_at": "2025-01-01T00:00:00"
        },
        "reminder_date": "2026-11-30",
        "is_done": true,
        "created_at": "2025-10-01T08:30:00"
    }))
    .unwrap();

    let category = item.category.unwrap();
    assert_eq!(category.id, item.category_id);
    assert_eq!(category.name, "Insurance");
    assert!(item.is_done);
}

#[test]
fn test_create_omits_missing_description() {
    let value = serde_json::to_value(create("Passport", 2, "2030-04-01")).unwrap();
    assert_eq!(
        value,
        json!({ "title": "Passport", "category_id": 2, "reminder_date": "2030-04-01" })
    );
}

#[test]
fn test_create_validation() {
    assert!(create("Passport", 2, "2030-04-01").validate().is_ok());

    let cases = [
        (create("", 2, "2030-04-01"), "Title cannot be empty"),
        (create("Passport", 0, "2030-04-01"), "Category id must be positive"),
        (create("Passport", 2, ""), "Reminder date must be YYYY-MM-DD"),
        (create("Passport", 2, "2030-13-01"), "Reminder date must be YYYY-MM-DD"),
        (create("<b>x</b>", 2, "2030-04-01"), "Invalid characters detected"),
        (create("JavaScript course", 2, "2030-04-01"), "Invalid characters detected"),
        (create(&"a".repeat(256), 2, "2030-04-01"), "Title is too long"),
    ];
    for (payload, expected) in cases {
        match payload.validate() {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }

    // Surrounding whitespace counts towards the limit
    assert!(create(&"a".repeat(255), 2, "2030-04-01").validate().is_ok());
    let padded = format!("  {}", "a".repeat(254));
    assert!(matches!(
        create(&padded, 2, "2030-04-01").validate(),
        Err(ClientError::Validation("Title is too long"))
    ));

    let mut long_description = create("Passport", 2, "2030-04-01");
    long_description.description = Some("d".repeat(1001));
    assert!(long_description.validate().is_err());
}

#[test]
fn test_empty_update_is_valid_noop() {
    let update = TrackingItemUpdate::default();
    assert!(update.is_empty());
    assert!(update.validate().is_ok());
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));

    let parsed: TrackingItemUpdate = serde_json::from_value(json!({})).unwrap();
    assert!(parsed.is_empty());
}

#[test]
fn test_update_fields_are_independent() {
    let update = TrackingItemUpdate {
        reminder_date: Some("2027-02-28".to_string()),
        ..Default::default()
    };
    assert!(!update.is_empty());
    assert!(update.validate().is_ok());
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({ "reminder_date": "2027-02-28" })
    );

    let bad = TrackingItemUpdate {
        title: Some("  ".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        bad.validate(),
        Err(ClientError::Validation("Title cannot be empty"))
    ));
}

#[test]
fn test_paginated_response_reports_server_pages() {
    let items: Vec<Value> = (1..=3).map(|i| json!({ "n": i })).collect();
    let page: PaginatedResponse<Value> = serde_json::from_value(json!({
        "items": items,
        "total": 10,
        "page": 1,
        "pages": 4,
        "page_size": 3
    }))
    .unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.pages, 4);
    assert!(page.check_page_size().is_ok());
    assert!(page.has_next());
    assert!(!page.has_previous());
}

#[test]
fn test_paginated_response_page_size_bound() {
    let page = PaginatedResponse {
        items: vec![1, 2, 3, 4],
        total: 4,
        page: 1,
        pages: 2,
        page_size: 3,
    };
    assert!(matches!(
        page.check_page_size(),
        Err(ClientError::InvalidResponse(_))
    ));

    let empty: PaginatedResponse<i32> = PaginatedResponse {
        items: vec![],
        total: 0,
        page: 1,
        pages: 0,
        page_size: 0,
    };
    assert!(empty.check_page_size().is_ok());
    assert_eq!(empty.computed_pages(), 0);

    let huge: PaginatedResponse<i32> = PaginatedResponse {
        items: vec![],
        total: u64::MAX,
        page: 1,
        pages: u32::MAX,
        page_size: 1,
    };
    assert_eq!(huge.computed_pages(), u32::MAX);
}

#[test]
fn test_item_query_pairs() {
    assert!(ItemQuery::default().to_pairs().is_empty());

    let query = ItemQuery {
        page: Some(2),
        page_size: Some(25),
        category_id: Some(5),
        is_done: Some(false),
    };
    assert_eq!(
        query.to_pairs(),
        vec![
            ("page", "2".to_string()),
            ("page_size", "25".to_string()),
            ("category_id", "5".to_string()),
            ("is_done", "false".to_string()),
        ]
    );
    assert_eq!(ItemQuery::page(3).page, Some(3));
}

#[test]
fn test_category_name_validation() {
    let ok = CategoryCreateOrUpdate {
        name: "  Home_office-2 ".to_string(),
    };
    assert!(ok.validate().is_ok());

    let too_long = "x".repeat(101);
    for name in ["", "   ", "Café", "a/b", too_long.as_str()] {
        let req = CategoryCreateOrUpdate {
            name: name.to_string(),
        };
        assert!(req.validate().is_err(), "{name:?} should be rejected");
    }

    let padded = CategoryCreateOrUpdate {
        name: format!(" {} ", "x".repeat(99)),
    };
    assert!(matches!(
        padded.validate(),
        Err(ClientError::Validation("Category name is too long"))
    ));
}

#[test]
fn test_auth_payloads() {
    assert!(EmailRequest {
        email: "user@example.com".to_string()
    }
    .validate()
    .is_ok());
    for email in ["", "user", "@example.com", "user@", "a@b@c"] {
        assert!(EmailRequest {
            email: email.to_string()
        }
        .validate()
        .is_err());
    }

    let otp = |code: &str| VerifyOtp {
        email: "user@example.com".to_string(),
        otp_code: code.to_string(),
    };
    assert!(otp("042917").validate().is_ok());
    assert!(otp("42917").validate().is_err());
    assert!(otp("04291a").validate().is_err());

    let token: TokenResponse = serde_json::from_value(json!({ "access_token": "abc" })).unwrap();
    assert_eq!(token.token_type, "bearer");
}
