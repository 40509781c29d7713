mod common;

use chrono::{TimeZone, Utc};
use common::{timeout_error, MockRest};
use refcheck::core::errors::ExchangeError;
use refcheck::core::traits::{ReferralVerifier, TradeVolumeSource};
use refcheck::core::types::{Uid, VerificationResult};
use refcheck::exchanges::bitunix::rest::{
    TRANS_AMOUNT_ENDPOINT, USER_LIST_ENDPOINT, VALIDATE_USER_ENDPOINT,
};
use refcheck::exchanges::bitunix::BitunixConnector;
use rust_decimal::Decimal;
use serde_json::json;

fn uid() -> Uid {
    Uid::parse("12345678").unwrap()
}

fn validated(result: bool) -> serde_json::Value {
    json!({"code": "0", "msg": "success", "result": {"result": result}})
}

#[tokio::test]
async fn test_validated_user_with_register_time() {
    let rest = MockRest::new().ok(validated(true)).ok(json!({
        "code": "0",
        "result": {"items": [{"uid": 12345678, "registerTime": "2023-11-14 22:13:20"}]}
    }));
    let connector = BitunixConnector::new(rest.clone());

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert_eq!(
        result,
        VerificationResult::verified(uid(), Utc.timestamp_opt(1_700_000_000, 0).single())
    );

    let calls = rest.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].endpoint, VALIDATE_USER_ENDPOINT);
    assert_eq!(calls[0].param("account"), Some("12345678"));
    assert_eq!(calls[0].body, None);

    assert_eq!(calls[1].method, "GET");
    assert_eq!(calls[1].endpoint, USER_LIST_ENDPOINT);
    assert_eq!(calls[1].param("uid"), Some("12345678"));
    assert!(calls[1].authenticated);
}

#[tokio::test]
async fn test_user_list_failure_keeps_verification() {
    let rest = MockRest::new()
        .ok(validated(true))
        .respond(Err(timeout_error()));
    let connector = BitunixConnector::new(rest);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(result.is_verified());
    assert_eq!(result.register_time(), None);
}

#[tokio::test]
async fn test_user_list_without_match_leaves_time_unknown() {
    let rest = MockRest::new()
        .ok(validated(true))
        .ok(json!({"code": "0", "result": {"items": [{"uid": 87654321, "registerTime": 1}]}}));
    let connector = BitunixConnector::new(rest);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(result.is_verified());
    assert_eq!(result.register_time(), None);
}

#[tokio::test]
async fn test_validation_false_is_not_verified() {
    let rest = MockRest::new().ok(validated(false));
    let connector = BitunixConnector::new(rest.clone());

    assert!(!connector.verify_uid(&uid()).await.unwrap().is_verified());
    assert_eq!(rest.calls().len(), 1);
}

#[tokio::test]
async fn test_non_zero_code_is_not_verified() {
    let rest = MockRest::new().ok(json!({"code": "10001", "msg": "user not found"}));
    let connector = BitunixConnector::new(rest);

    match connector.verify_uid(&uid()).await.unwrap() {
        VerificationResult::NotVerified { reason, .. } => assert!(reason.contains("10001")),
        other => panic!("expected NotVerified, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_unauthorized_is_auth_error() {
    let rest = MockRest::new().respond(Err(ExchangeError::ApiError {
        code: 403,
        message: "forbidden".to_string(),
    }));
    let connector = BitunixConnector::new(rest);

    let err = connector.verify_uid(&uid()).await.unwrap_err();
    assert!(matches!(err, ExchangeError::AuthError(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_timeout_propagates_as_transport_error() {
    let rest = MockRest::new().respond(Err(timeout_error()));
    let connector = BitunixConnector::new(rest);

    assert!(connector.verify_uid(&uid()).await.unwrap_err().is_transport());
}

#[tokio::test]
async fn test_trade_volumes_zero_fill_failed_window() {
    let rest = MockRest::new()
        .ok(json!({"code": "0", "result": {"items": [
            {"transVolume": "100", "ctime": "2024-01-02T00:00:00Z"},
            {"transVolume": "0.75"}
        ]}}))
        .respond(Err(timeout_error()))
        .ok(json!({"code": "0", "result": {"items": [{"transVolume": 5}]}}));
    let connector = BitunixConnector::new(rest.clone());
    let register = Utc.with_ymd_and_hms(2022, 3, 15, 8, 0, 0).unwrap();

    let summary = connector
        .get_trade_volumes(&uid(), Some(register))
        .await
        .unwrap();
    assert_eq!(summary.total_volume, Decimal::new(10075, 2));
    assert_eq!(summary.last_month_volume, Decimal::ZERO);
    assert_eq!(summary.current_month_volume, Decimal::from(5));

    let calls = rest.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.endpoint == TRANS_AMOUNT_ENDPOINT));
    assert_eq!(calls[0].param("startTime"), Some("2022-03-15T08:00:00.000Z"));

    let current_start = calls[2].param("startTime").unwrap();
    assert!(current_start.ends_with("-01T00:00:00.000Z"));
    assert_eq!(calls[1].param("endTime"), Some(current_start));
}

#[tokio::test]
async fn test_trade_volumes_rejected_window_counts_zero() {
    let rest = MockRest::new()
        .ok(json!({"code": "2", "msg": "busy"}))
        .ok(json!({"code": "0", "result": {"items": []}}))
        .ok(json!({"code": "0", "result": null}));
    let connector = BitunixConnector::new(rest);

    let summary = connector.get_trade_volumes(&uid(), None).await.unwrap();
    assert_eq!(summary.total_volume, Decimal::ZERO);
    assert_eq!(summary.last_month_volume, Decimal::ZERO);
    assert_eq!(summary.current_month_volume, Decimal::ZERO);
}

#[tokio::test]
async fn test_overflowing_window_counts_zero() {
    let rest = MockRest::new()
        .ok(json!({"code": "0", "result": {"items": [
            {"transVolume": "79228162514264337593543950335"},
            {"transVolume": "79228162514264337593543950335"}
        ]}}))
        .ok(json!({"code": "0", "result": {"items": [{"transVolume": "4"}]}}))
        .ok(json!({"code": "0", "result": {"items": [{"transVolume": "1"}]}}));
    let connector = BitunixConnector::new(rest);

    let summary = connector.get_trade_volumes(&uid(), None).await.unwrap();
    assert_eq!(summary.total_volume, Decimal::ZERO);
    assert_eq!(summary.last_month_volume, Decimal::from(4));
    assert_eq!(summary.current_month_volume, Decimal::from(1));
}
