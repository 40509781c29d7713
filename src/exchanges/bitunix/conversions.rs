use super::types::{BitunixTrade, BitunixUser};
use crate::core::errors::ExchangeError;
use crate::core::types::{conversion, Uid};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

/// Registration time of `uid` in a user list, if present and parseable
pub fn find_register_time(uid: &Uid, users: &[BitunixUser]) -> Option<DateTime<Utc>> {
    users
        .iter()
        .find(|user| user.uid == uid.as_str())
        .and_then(|user| user.register_time.as_ref())
        .and_then(conversion::value_to_datetime)
}

/// Sum the `transVolume` field of every trade; bad values count as zero
pub fn sum_trade_volumes(trades: &[BitunixTrade]) -> Result<Decimal, ExchangeError> {
    conversion::checked_volume_sum(
        trades
            .iter()
            .map(|trade| conversion::value_to_volume(trade.trans_volume.as_ref())),
    )
    .ok_or_else(|| {
        ExchangeError::InvalidResponseFormat(format!(
            "trade volume of {} entries overflows",
            trades.len()
        ))
    })
}

/// UTC ISO-8601 with millisecond precision, e.g. `2024-03-01T00:00:00.000Z`
pub fn to_iso_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_find_register_time_exact_match() {
        let users: Vec<BitunixUser> = serde_json::from_value(json!([
            {"uid": 123456789, "registerTime": 1},
            {"uid": 12345678, "registerTime": "2023-11-14 22:13:20"}
        ]))
        .unwrap();
        let uid = Uid::parse("12345678").unwrap();

        assert_eq!(
            find_register_time(&uid, &users),
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );
        assert_eq!(
            find_register_time(&Uid::parse("99999").unwrap(), &users),
            None
        );
    }

    #[test]
    fn test_sum_trade_volumes() {
        let trades: Vec<BitunixTrade> = serde_json::from_value(json!([
            {"transVolume": "10.25", "ctime": "2024-03-02T00:00:00Z"},
            {"transVolume": 5},
            {"transVolume": null},
            {"transVolume": "oops"}
        ]))
        .unwrap();
        assert_eq!(sum_trade_volumes(&trades).unwrap(), Decimal::new(1525, 2));
    }

    #[test]
    fn test_iso_string() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(to_iso_string(t), "2024-03-01T00:00:00.000Z");
    }
}
