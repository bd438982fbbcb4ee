use chrono::Weekday;
use serde_json::{json, Value};


use fixtures::{create_test_app, next_weekday};

fn booking_request(date: &str, time: &str, duration: i64, resource: &str) -> Value {
    json!({
        "date": date,
        "time": time,
        "duration": duration.to_string(),
        "resource": resource,
        "firstName": "Elena",
        "lastName": "Dimitrova",
        "email": "elena@example.com",
        "phone": "0888 000 111",
        "procedure": "Physiotherapy",
    })
}

fn available_times(body: &Value) -> Vec<String> {
    body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|slot| slot["available"] == true)
        .map(|slot| slot["time"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_ping() {
    let app = create_test_app();

    let (status, body) = app.get("/api/ping").await;

    assert_eq!(status, 200);
    assert_eq!(body, "pong");
}

#[tokio::test]
async fn test_booking_flow() {
    let app = create_test_app();
    let day = next_weekday(&app.policy, Weekday::Wed).format("%Y-%m-%d").to_string();

    // Step 1: Check availability; Maria covers the morning, Petar the afternoon
    let (status, body) = app
        .get(&format!("/api/availability?date={day}&duration=60&resource=any"))
        .await;
    assert_eq!(status, 200);
    let before = available_times(&body);
    assert_eq!(before.first().map(String::as_str), Some("09:00"));
    assert_eq!(before.last().map(String::as_str), Some("17:30"));
    assert_eq!(before.len(), 18);

    // Step 2: Book Maria at 12:00
    let (status, body) = app
        .post_json("/api/book", &booking_request(&day, "12:00", 60, "maria"))
        .await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["logStatus"], "appended");
    let events = app.calendar.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].calendar_id, "maria@example.com");

    // Step 3: Maria is gone at noon, "any" still has Petar
    let (_, body) = app
        .get(&format!("/api/availability?date={day}&duration=60&resource=maria"))
        .await;
    assert!(!available_times(&body).contains(&"12:00".to_string()));
    let (_, body) = app
        .get(&format!("/api/availability?date={day}&duration=60&resource=any"))
        .await;
    assert!(available_times(&body).contains(&"12:00".to_string()));

    // Step 4: Booking Maria again is a conflict, "any" falls through to Petar
    let (status, body) = app
        .post_json("/api/book", &booking_request(&day, "12:00", 60, "maria"))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["ok"], false);
    let (status, _) = app
        .post_json("/api/book", &booking_request(&day, "12:00", 60, "any"))
        .await;
    assert_eq!(status, 200);
    assert_eq!(app.calendar.events()[1].calendar_id, "clinic@example.com");

    // Step 5: Nobody is left at noon
    let (_, body) = app
        .get(&format!("/api/availability?date={day}&duration=60&resource=any"))
        .await;
    assert!(!available_times(&body).contains(&"12:00".to_string()));
    let (status, _) = app
        .post_json("/api/book", &booking_request(&day, "12:30", 30, "any"))
        .await;
    assert_eq!(status, 409);

    let records = app.booking_log.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].resource.as_deref(), Some("maria"));
    assert_eq!(records[1].resource.as_deref(), Some("petar"));
}

#[tokio::test]
async fn test_saturday_only_has_petar() {
    let app = create_test_app();
    let saturday = next_weekday(&app.policy, Weekday::Sat);

    let (_, body) = app
        .get(&format!("/api/availability?date={saturday}&duration=30"))
        .await;
    let times = available_times(&body);
    assert_eq!(times.first().map(String::as_str), Some("12:00"));
    assert_eq!(times.last().map(String::as_str), Some("18:00"));

    let (status, body) = app
        .post_json(
            "/api/book",
            &booking_request(&saturday.to_string(), "10:00", 30, "any"),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "10:00 for 30 minutes is outside working hours");

    let (_, body) = app
        .get(&format!("/api/availability?date={saturday}&resource=maria"))
        .await;
    assert_eq!(body, json!({ "slots": [] }));
}

#[tokio::test]
async fn test_resources_endpoint() {
    let app = create_test_app();

    let (status, body) = app.get("/api/resources").await;

    assert_eq!(status, 200);
    assert_eq!(body["resources"][0]["id"], "maria");
    assert_eq!(body["resources"][1]["name"], "Petar Georgiev");
}

#[tokio::test]
async fn test_unsupported_duration_from_config() {
    let app = create_test_app();
    let day = next_weekday(&app.policy, Weekday::Tue);

    // 90 minutes is a default, but this clinic only offers 30 and 60
    let (status, body) = app
        .get(&format!("/api/availability?date={day}&duration=90"))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Unsupported duration: 90 minutes");
}
