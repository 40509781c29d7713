mod common;

use chrono::{TimeZone, Utc};
use common::{timeout_error, MockRest};
use refcheck::core::errors::ExchangeError;
use refcheck::core::traits::{ReferralVerifier, TradeVolumeSource};
use refcheck::core::types::{Uid, VerificationResult};
use refcheck::exchanges::bitget::rest::{CUSTOMER_LIST_ENDPOINT, TRADE_VOLUME_ENDPOINT};
use refcheck::exchanges::bitget::BitgetConnector;
use rust_decimal::Decimal;
use serde_json::json;

fn uid() -> Uid {
    Uid::parse("12345678").unwrap()
}

#[tokio::test]
async fn test_verified_customer_with_register_time() {
    let rest = MockRest::new().ok(json!({
        "code": "00000",
        "msg": "success",
        "data": {"uid": "12345678", "registerTime": "1700000000000"}
    }));
    let connector = BitgetConnector::new(rest.clone(), None);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert_eq!(
        result,
        VerificationResult::verified(uid(), Utc.timestamp_millis_opt(1_700_000_000_000).single())
    );

    let calls = rest.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].endpoint, CUSTOMER_LIST_ENDPOINT);
    assert!(calls[0].authenticated);
    assert_eq!(calls[0].body, Some(json!({"uid": "12345678"})));
}

#[tokio::test]
async fn test_referral_code_is_sent_when_configured() {
    let rest = MockRest::new().ok(json!({"code": "00000", "data": []}));
    let connector = BitgetConnector::new(rest.clone(), Some("ywfh2025".to_string()));

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(!result.is_verified());
    assert_eq!(
        rest.calls()[0].body,
        Some(json!({"uid": "12345678", "referralCode": "ywfh2025"}))
    );
}

#[tokio::test]
async fn test_list_payload_requires_exact_uid() {
    let rest = MockRest::new().ok(json!({
        "code": "00000",
        "data": [
            {"uid": "123456789", "registerTime": 1_700_000_000_000_i64},
            {"uid": 1234567, "registerTime": 1_700_000_000_000_i64}
        ]
    }));
    let connector = BitgetConnector::new(rest, None);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(matches!(result, VerificationResult::NotVerified { .. }));
}

#[tokio::test]
async fn test_non_success_code_is_not_verified() {
    let rest = MockRest::new().ok(json!({"code": "40001", "msg": "param error", "data": null}));
    let connector = BitgetConnector::new(rest, None);

    match connector.verify_uid(&uid()).await.unwrap() {
        VerificationResult::NotVerified { reason, .. } => assert!(reason.contains("40001")),
        other => panic!("expected NotVerified, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejection_inside_http_error_is_not_verified() {
    let rest = MockRest::new().respond(Err(ExchangeError::ApiError {
        code: 400,
        message: r#"{"code":"40001","msg":"param error","data":null}"#.to_string(),
    }));
    let connector = BitgetConnector::new(rest, None);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(!result.is_verified());
}

#[tokio::test]
async fn test_null_data_is_not_verified() {
    let rest = MockRest::new().ok(json!({"code": "00000", "data": null}));
    let connector = BitgetConnector::new(rest, None);
    assert!(!connector.verify_uid(&uid()).await.unwrap().is_verified());
}

#[tokio::test]
async fn test_auth_codes_are_errors() {
    let rest = MockRest::new().respond(Err(ExchangeError::ApiError {
        code: 400,
        message: r#"{"code":"40037","msg":"Apikey does not exist"}"#.to_string(),
    }));
    let connector = BitgetConnector::new(rest, None);
    assert!(matches!(
        connector.verify_uid(&uid()).await,
        Err(ExchangeError::AuthError(_))
    ));

    let rest = MockRest::new().respond(Err(ExchangeError::ApiError {
        code: 401,
        message: "<html>Unauthorized</html>".to_string(),
    }));
    let connector = BitgetConnector::new(rest, None);
    assert!(matches!(
        connector.verify_uid(&uid()).await,
        Err(ExchangeError::AuthError(_))
    ));
}

#[tokio::test]
async fn test_unexpected_payloads_are_format_errors() {
    let rest = MockRest::new().ok(json!({"unexpected": true}));
    let connector = BitgetConnector::new(rest, None);
    assert!(matches!(
        connector.verify_uid(&uid()).await,
        Err(ExchangeError::InvalidResponseFormat(_))
    ));

    let rest = MockRest::new().ok(json!({"code": "00000", "data": "not a customer"}));
    let connector = BitgetConnector::new(rest, None);
    assert!(matches!(
        connector.verify_uid(&uid()).await,
        Err(ExchangeError::InvalidResponseFormat(_))
    ));
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let rest = MockRest::new().respond(Err(timeout_error()));
    let connector = BitgetConnector::new(rest, None);
    let err = connector.verify_uid(&uid()).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_trade_volumes_query_three_windows() {
    let rest = MockRest::new()
        .ok(json!({"code": "00000", "data": [{"volumn": "100.5"}, {"volumn": 20}]}))
        .ok(json!({"code": "00000", "data": [{"volumn": "30"}, {"volumn": "n/a"}]}))
        .ok(json!({"code": "40001", "msg": "no data"}));
    let connector = BitgetConnector::new(rest.clone(), None);
    let register = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();

    let summary = connector
        .get_trade_volumes(&uid(), Some(register))
        .await
        .unwrap();
    assert_eq!(summary.total_volume, Decimal::new(1205, 1));
    assert_eq!(summary.last_month_volume, Decimal::from(30));
    assert_eq!(summary.current_month_volume, Decimal::ZERO);

    let calls = rest.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.endpoint == TRADE_VOLUME_ENDPOINT));

    let total = calls[0].body.as_ref().unwrap();
    assert_eq!(total["uid"], "12345678");
    assert_eq!(total["startTime"], register.timestamp_millis().to_string());

    // last month ends where the current month starts
    let last = calls[1].body.as_ref().unwrap();
    let current = calls[2].body.as_ref().unwrap();
    assert_eq!(last["endTime"], current["startTime"]);
    assert_eq!(total["endTime"], current["endTime"]);
}

#[tokio::test]
async fn test_trade_volumes_unknown_register_time_uses_history_floor() {
    let rest = MockRest::new()
        .ok(json!({"code": "00000", "data": []}))
        .ok(json!({"code": "00000", "data": []}))
        .ok(json!({"code": "00000", "data": []}));
    let connector = BitgetConnector::new(rest.clone(), None);

    connector.get_trade_volumes(&uid(), None).await.unwrap();
    let floor = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        rest.calls()[0].body.as_ref().unwrap()["startTime"],
        floor.timestamp_millis().to_string()
    );
}

#[tokio::test]
async fn test_trade_volume_errors_propagate() {
    let rest = MockRest::new()
        .ok(json!({"code": "00000", "data": [{"volumn": "1"}]}))
        .respond(Err(timeout_error()));
    let connector = BitgetConnector::new(rest.clone(), None);

    let result = connector.get_trade_volumes(&uid(), None).await;
    assert!(result.is_err());
    assert_eq!(rest.calls().len(), 2);
}

#[tokio::test]
async fn test_out_of_range_register_time_is_unknown() {
    let rest = MockRest::new().ok(json!({
        "code": "00000",
        "data": {"uid": "12345678", "registerTime": "-9223372036854775808"}
    }));
    let connector = BitgetConnector::new(rest, None);

    let result = connector.verify_uid(&uid()).await.unwrap();
    assert!(result.is_verified());
    assert_eq!(result.register_time(), None);
}

#[tokio::test]
async fn test_overflowing_trade_volume_is_format_error() {
    let rest = MockRest::new().ok(json!({"code": "00000", "data": [
        {"volumn": "79228162514264337593543950335"},
        {"volumn": "79228162514264337593543950335"}
    ]}));
    let connector = BitgetConnector::new(rest, None);

    let err = connector.get_trade_volumes(&uid(), None).await.unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidResponseFormat(_)));
}
