mod common;

use async_graphql::{Value, Variables};
use chrono::{DateTime, Utc};
use common::*;
use serde_json::json;
use uuid::Uuid;

const AVAILABLE_SLOTS: &str = r#"
    query Slots($restaurantId: UUID!, $date: NaiveDate!) {
        availableSlots(restaurantId: $restaurantId, date: $date) {
            start
            end
            available
        }
    }
"#;

// 2025-03-12 is a Wednesday.
const WEDNESDAY: &str = "2025-03-12";

fn slot_vars(restaurant_id: Uuid, date: &str) -> Variables {
    Variables::from_json(json!({
        "restaurantId": restaurant_id.to_string(),
        "date": date,
    }))
}

fn parse_instant(v: &serde_json::Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(v.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn test_open_day_lists_every_half_hour() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("day-{suffix}"), "Patan", 20, "Asia/Kathmandu")
            .await;
    set_opening_hour(&app.state, restaurant_id, 3, "09:00", "17:00", false).await;

    let response = execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(restaurant_id, WEDNESDAY))).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let slots = data["availableSlots"].as_array().unwrap();
    assert_eq!(slots.len(), 16);

    // 09:00 and 17:00 in Kathmandu (UTC+05:45).
    assert_eq!(
        parse_instant(&slots[0]["start"]),
        "2025-03-12T03:15:00Z".parse::<DateTime<Utc>>().unwrap()
    );
    assert_eq!(
        parse_instant(&slots[15]["end"]),
        "2025-03-12T11:15:00Z".parse::<DateTime<Utc>>().unwrap()
    );
    assert!(slots.iter().all(|s| s["available"] == 20));
}

#[tokio::test]
async fn test_closed_day_has_no_slots() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("shut-{suffix}"), "Patan", 20, "Asia/Kathmandu")
            .await;
    set_opening_hour(&app.state, restaurant_id, 3, "09:00", "17:00", true).await;
    // Thursday has no row at all.

    for date in [WEDNESDAY, "2025-03-13"] {
        let response =
            execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(restaurant_id, date))).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["availableSlots"], json!([]));
    }
}

#[tokio::test]
async fn test_bookings_reduce_overlapping_slots() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("busy-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;
    set_opening_hour(&app.state, restaurant_id, 3, "18:00", "22:00", false).await;

    let booking = r#"
        mutation Book($input: CreateReservationInput!) {
            createReservation(input: $input) { id }
        }
    "#;
    for (starts_at, party, status) in [
        ("2025-03-12T19:00:00+05:45", 6, None),
        ("2025-03-12T21:00:00+05:45", 10, Some("CANCELLED")),
    ] {
        let response = execute_graphql(
            &app.schema,
            booking,
            Some(Variables::from_json(json!({
                "input": {
                    "restaurantId": restaurant_id.to_string(),
                    "startsAt": starts_at,
                    "partySize": party,
                    "customer": { "name": "Guest", "email": format!("busy-{suffix}@test.com") }
                }
            }))),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        if let Some(status) = status {
            let data = response.data.into_json().unwrap();
            let id = data["createReservation"]["id"].as_str().unwrap().to_string();
            let cancel = execute_graphql(
                &app.schema,
                r#"mutation($id: UUID!, $status: ReservationStatus!) {
                    updateReservationStatus(id: $id, status: $status) { status }
                }"#,
                Some(Variables::from_json(json!({ "id": id, "status": status }))),
            )
            .await;
            assert!(cancel.errors.is_empty(), "{:?}", cancel.errors);
        }
    }

    let response =
        execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(restaurant_id, WEDNESDAY))).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let available: Vec<i64> = data["availableSlots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["available"].as_i64().unwrap())
        .collect();

    // Each slot probes 90 minutes ahead; the cancelled party never counts.
    assert_eq!(available, vec![4, 4, 4, 4, 4, 10, 10, 10]);
}

#[tokio::test]
async fn test_unknown_restaurant_is_an_error() {
    let app = setup_test_app().await;

    let response =
        execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(Uuid::new_v4(), WEDNESDAY))).await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Restaurant not found");
}

#[tokio::test]
async fn test_unknown_timezone_fails_closed() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("tz-{suffix}"), "Patan", 10, "Mars/Olympus_Mons")
            .await;
    set_opening_hour(&app.state, restaurant_id, 3, "18:00", "22:00", false).await;

    let response =
        execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(restaurant_id, WEDNESDAY))).await;
    assert_eq!(response.errors.len(), 1);
    let code = response.errors[0]
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code").cloned());
    assert_eq!(code, Some(Value::from("INVALID_TIMEZONE")));
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let app = setup_test_app().await;

    let response =
        execute_graphql(&app.schema, AVAILABLE_SLOTS, Some(slot_vars(Uuid::new_v4(), "12/03/2025"))).await;
    assert!(!response.errors.is_empty());
}
