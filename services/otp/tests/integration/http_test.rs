use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::{TEST_USER_ID, test_server};

#[tokio::test]
async fn should_send_otp_to_valid_user() {
    let server = test_server().await;

    let resp = server
        .post("/otp/send")
        .json(&json!({ "user_id": TEST_USER_ID }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    let body: Value = resp.json();
    assert_eq!(body["message"], "OTP created");
    let otp = body["otp"].as_str().expect("otp should be a string");
    let n: u32 = otp.parse().unwrap();
    assert!((100_000..=999_999).contains(&n), "unexpected otp {otp}");
}

#[tokio::test]
async fn should_require_user_id_on_send() {
    let server = test_server().await;

    for body in [json!({}), json!({ "user_id": "" }), json!({ "user_id": 42 })] {
        let resp = server.post("/otp/send").json(&body).await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp.json::<Value>(), json!({ "error": "user_id is required" }));
    }
}

#[tokio::test]
async fn should_require_user_id_when_body_is_not_json() {
    let server = test_server().await;

    let resp = server.post("/otp/send").text("user_id=test-user").await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "user_id is required");
}

#[tokio::test]
async fn should_verify_sent_otp() {
    let server = test_server().await;

    let sent = server
        .post("/otp/send")
        .json(&json!({ "user_id": TEST_USER_ID }))
        .await;
    let otp = sent.json::<Value>()["otp"].as_str().unwrap().to_owned();

    let resp = server
        .post("/otp/verify")
        .json(&json!({ "user_id": TEST_USER_ID, "code": otp }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "message": "OTP verified successfully" })
    );
}

#[tokio::test]
async fn should_reject_replayed_otp() {
    let server = test_server().await;

    let sent = server
        .post("/otp/send")
        .json(&json!({ "user_id": TEST_USER_ID }))
        .await;
    let otp = sent.json::<Value>()["otp"].as_str().unwrap().to_owned();
    let verify_body = json!({ "user_id": TEST_USER_ID, "code": otp });

    let first = server.post("/otp/verify").json(&verify_body).await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = server.post("/otp/verify").json(&verify_body).await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(second.json::<Value>()["error"], "Invalid or expired OTP");
}

#[tokio::test]
async fn should_reject_sent_otp_for_another_user() {
    let server = test_server().await;

    let sent = server
        .post("/otp/send")
        .json(&json!({ "user_id": "alice" }))
        .await;
    let otp = sent.json::<Value>()["otp"].as_str().unwrap().to_owned();

    let resp = server
        .post("/otp/verify")
        .json(&json!({ "user_id": "bob", "code": otp }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "Invalid or expired OTP");
}

#[tokio::test]
async fn should_return_error_for_invalid_otp() {
    let server = test_server().await;

    let resp = server
        .post("/otp/verify")
        .json(&json!({ "user_id": TEST_USER_ID, "code": "000000" }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "error": "Invalid or expired OTP" })
    );
}

#[tokio::test]
async fn should_require_user_id_and_code_on_verify() {
    let server = test_server().await;

    for body in [
        json!({ "user_id": TEST_USER_ID }),
        json!({ "code": "123456" }),
        json!({ "user_id": TEST_USER_ID, "code": "" }),
        json!({}),
    ] {
        let resp = server.post("/otp/verify").json(&body).await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(
            resp.json::<Value>()["error"],
            "user_id and code are required"
        );
    }
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = test_server().await;

    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_attach_request_id() {
    let server = test_server().await;

    let resp = server.get("/healthz").await;

    assert!(resp.headers().get("x-request-id").is_some());
}
