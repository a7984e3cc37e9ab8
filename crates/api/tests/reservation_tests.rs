mod common;

use api::services::reservations::{self, CreateReservationParams, ReservationError};
use async_graphql::{Value, Variables};
use common::*;
use infra::repos::NewCustomer;
use serde_json::json;
use uuid::Uuid;

const CREATE_RESERVATION: &str = r#"
    mutation CreateReservation($input: CreateReservationInput!) {
        createReservation(input: $input) {
            id
            status
            partySize
            durationMin
            startsAt
            endsAt
            restaurant { id capacity }
            customer { email }
        }
    }
"#;

const UPDATE_STATUS: &str = r#"
    mutation UpdateStatus($id: UUID!, $status: ReservationStatus!) {
        updateReservationStatus(id: $id, status: $status) {
            id
            status
        }
    }
"#;

fn reservation_vars(
    restaurant_id: Uuid,
    starts_at: &str,
    party_size: i32,
    email: &str,
) -> Variables {
    Variables::from_json(json!({
        "input": {
            "restaurantId": restaurant_id.to_string(),
            "startsAt": starts_at,
            "partySize": party_size,
            "customer": {
                "name": "Test Guest",
                "email": email,
                "phone": "+977-1-5550100"
            }
        }
    }))
}

fn error_code(response: &async_graphql::Response) -> Option<Value> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code").cloned())
}

#[tokio::test]
async fn test_second_party_over_capacity_is_rejected_without_side_effects() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("full-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;

    let first = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:00:00+05:45",
            6,
            &format!("first-{suffix}@test.com"),
        )),
    )
    .await;
    assert!(first.errors.is_empty(), "first booking: {:?}", first.errors);

    let data = first.data.into_json().unwrap();
    let created = &data["createReservation"];
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["partySize"], 6);
    assert_eq!(created["durationMin"], 90);
    assert_eq!(created["restaurant"]["id"], restaurant_id.to_string());

    let rejected_email = format!("second-{suffix}@test.com");
    let second = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:30:00+05:45",
            5,
            &rejected_email,
        )),
    )
    .await;

    assert_eq!(second.errors.len(), 1);
    assert_eq!(error_code(&second), Some(Value::from("CAPACITY_EXCEEDED")));
    assert!(second.errors[0].message.contains("full"));

    assert_eq!(count_reservations(&app.state, restaurant_id).await, 1);
    assert_eq!(count_customers_with_email(&app.state, &rejected_email).await, 0);
}

#[tokio::test]
async fn test_second_party_filling_capacity_is_admitted() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("exact-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;

    for (starts_at, party) in [
        ("2025-03-12T19:00:00+05:45", 6),
        ("2025-03-12T19:30:00+05:45", 4),
    ] {
        let response = execute_graphql(
            &app.schema,
            CREATE_RESERVATION,
            Some(reservation_vars(
                restaurant_id,
                starts_at,
                party,
                &format!("guest-{suffix}@test.com"),
            )),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }

    assert_eq!(count_reservations(&app.state, restaurant_id).await, 2);
    // Both bookings used the same contact details.
    assert_eq!(
        count_customers_with_email(&app.state, &format!("guest-{suffix}@test.com")).await,
        1
    );
}

#[tokio::test]
async fn test_concurrent_requests_never_overbook() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("rush-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;

    let mut handles = Vec::new();
    for i in 0..12 {
        let pool = app.state.db.clone();
        let email = format!("rush-{i}-{suffix}@test.com");
        handles.push(tokio::spawn(async move {
            reservations::create_reservation(
                &pool,
                CreateReservationParams {
                    restaurant_id,
                    starts_at: "2025-03-12T19:00:00+05:45".to_string(),
                    duration_min: None,
                    party_size: 3,
                    course_id: None,
                    customer: NewCustomer {
                        name: format!("Guest {i}"),
                        email,
                        phone: "+977-1-5550100".to_string(),
                    },
                },
            )
            .await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ReservationError::CapacityExceeded { capacity, .. }) => assert_eq!(capacity, 10),
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(admitted, 3);
    let covers: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(party_size), 0)::bigint FROM reservations WHERE restaurant_id = $1",
    )
    .bind(restaurant_id)
    .fetch_one(&app.state.db)
    .await
    .unwrap();
    assert_eq!(covers, 9);
}

#[tokio::test]
async fn test_status_lifecycle_and_cancel_frees_capacity() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("cycle-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;

    let created = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:00:00+05:45",
            10,
            &format!("cycle-{suffix}@test.com"),
        )),
    )
    .await;
    assert!(created.errors.is_empty(), "{:?}", created.errors);
    let data = created.data.into_json().unwrap();
    let id = data["createReservation"]["id"].as_str().unwrap().to_string();

    let confirm = execute_graphql(
        &app.schema,
        UPDATE_STATUS,
        Some(Variables::from_json(json!({ "id": id, "status": "CONFIRMED" }))),
    )
    .await;
    assert!(confirm.errors.is_empty(), "{:?}", confirm.errors);
    assert_eq!(
        confirm.data.into_json().unwrap()["updateReservationStatus"]["status"],
        "CONFIRMED"
    );

    // Full while confirmed.
    let blocked = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:30:00+05:45",
            1,
            &format!("late-{suffix}@test.com"),
        )),
    )
    .await;
    assert_eq!(error_code(&blocked), Some(Value::from("CAPACITY_EXCEEDED")));

    let cancel = execute_graphql(
        &app.schema,
        UPDATE_STATUS,
        Some(Variables::from_json(json!({ "id": id, "status": "CANCELLED" }))),
    )
    .await;
    assert!(cancel.errors.is_empty(), "{:?}", cancel.errors);

    let reopen = execute_graphql(
        &app.schema,
        UPDATE_STATUS,
        Some(Variables::from_json(json!({ "id": id, "status": "PENDING" }))),
    )
    .await;
    assert_eq!(error_code(&reopen), Some(Value::from("INVALID_TRANSITION")));

    let after_cancel = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:30:00+05:45",
            10,
            &format!("late-{suffix}@test.com"),
        )),
    )
    .await;
    assert!(after_cancel.errors.is_empty(), "{:?}", after_cancel.errors);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("bad-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;

    let zero_party = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            restaurant_id,
            "2025-03-12T19:00:00+05:45",
            0,
            "zero@test.com",
        )),
    )
    .await;
    assert_eq!(error_code(&zero_party), Some(Value::from("BAD_USER_INPUT")));

    let bad_time = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(restaurant_id, "tomorrow at 7", 2, "when@test.com")),
    )
    .await;
    assert_eq!(error_code(&bad_time), Some(Value::from("BAD_USER_INPUT")));

    let unknown = execute_graphql(
        &app.schema,
        CREATE_RESERVATION,
        Some(reservation_vars(
            Uuid::new_v4(),
            "2025-03-12T19:00:00+05:45",
            2,
            "nobody@test.com",
        )),
    )
    .await;
    assert_eq!(error_code(&unknown), Some(Value::from("NOT_FOUND")));

    assert_eq!(count_reservations(&app.state, restaurant_id).await, 0);
}

#[tokio::test]
async fn test_reservations_listing_is_paginated() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("list-{suffix}"), "Patan", 50, "Asia/Kathmandu")
            .await;

    for hour in [18, 19, 20] {
        let response = execute_graphql(
            &app.schema,
            CREATE_RESERVATION,
            Some(reservation_vars(
                restaurant_id,
                &format!("2025-03-12T{hour}:00:00+05:45"),
                2,
                &format!("list-{suffix}@test.com"),
            )),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }

    let query = r#"
        query Reservations($restaurantId: UUID!) {
            reservations(
                filter: { restaurantId: $restaurantId, status: PENDING }
                pagination: { limit: 2, offset: 0 }
            ) {
                items { id partySize }
                totalCount
                pageSize
                hasNextPage
            }
        }
    "#;
    let response = execute_graphql(
        &app.schema,
        query,
        Some(Variables::from_json(json!({ "restaurantId": restaurant_id.to_string() }))),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let page = &data["reservations"];
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageSize"], 2);
    assert_eq!(page["hasNextPage"], true);
}

fn course_vars(restaurant_id: Uuid, course_id: Uuid, email: &str) -> Variables {
    Variables::from_json(json!({
        "input": {
            "restaurantId": restaurant_id.to_string(),
            "startsAt": "2025-03-12T19:00:00+05:45",
            "partySize": 2,
            "courseId": course_id.to_string(),
            "customer": {
                "name": "Course Guest",
                "email": email,
                "phone": "+977-1-5550100"
            }
        }
    }))
}

#[tokio::test]
async fn test_unknown_course_is_rejected_without_side_effects() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("course-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;
    let other_id =
        create_test_restaurant(&app.state, &format!("other-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;
    let foreign_course = create_test_course(&app.state, other_id, "Set dinner").await;
    let email = format!("course-{suffix}@test.com");

    for course_id in [Uuid::new_v4(), foreign_course] {
        let response = execute_graphql(
            &app.schema,
            CREATE_RESERVATION,
            Some(course_vars(restaurant_id, course_id, &email)),
        )
        .await;
        assert_eq!(response.errors.len(), 1);
        assert_eq!(error_code(&response), Some(Value::from("NOT_FOUND")));
    }

    assert_eq!(count_reservations(&app.state, restaurant_id).await, 0);
    assert_eq!(count_customers_with_email(&app.state, &email).await, 0);
}

#[tokio::test]
async fn test_reservation_keeps_its_course() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let restaurant_id =
        create_test_restaurant(&app.state, &format!("menu-{suffix}"), "Patan", 10, "Asia/Kathmandu")
            .await;
    let course_id = create_test_course(&app.state, restaurant_id, "Newari feast").await;

    let response = execute_graphql(
        &app.schema,
        r#"
        mutation CreateReservation($input: CreateReservationInput!) {
            createReservation(input: $input) { id courseId }
        }
        "#,
        Some(course_vars(restaurant_id, course_id, &format!("menu-{suffix}@test.com"))),
    )
    .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["createReservation"]["courseId"], course_id.to_string());
}

#[tokio::test]
async fn test_concurrent_first_bookings_share_one_customer() {
    let app = setup_test_app().await;
    let suffix = unique_suffix();
    let email = format!("twin-{suffix}@test.com");

    // Different restaurants, so the admissions don't serialize on one row lock.
    let mut handles = Vec::new();
    for i in 0..6 {
        let restaurant_id = create_test_restaurant(
            &app.state,
            &format!("twin-{i}-{suffix}"),
            "Patan",
            10,
            "Asia/Kathmandu",
        )
        .await;
        let pool = app.state.db.clone();
        let email = email.clone();
        handles.push(tokio::spawn(async move {
            reservations::create_reservation(
                &pool,
                CreateReservationParams {
                    restaurant_id,
                    starts_at: "2025-03-12T19:00:00+05:45".to_string(),
                    duration_min: None,
                    party_size: 2,
                    course_id: None,
                    customer: NewCustomer {
                        name: "Twin".to_string(),
                        email,
                        phone: "+977-1-5550199".to_string(),
                    },
                },
            )
            .await
        }));
    }

    let mut customer_ids = Vec::new();
    for handle in handles {
        let row = handle.await.unwrap().expect("booking should be admitted");
        customer_ids.push(row.customer_id);
    }

    customer_ids.dedup();
    assert_eq!(customer_ids.len(), 1);
    assert_eq!(count_customers_with_email(&app.state, &email).await, 1);
}
