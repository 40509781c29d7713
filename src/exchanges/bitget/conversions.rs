use super::types::{BitgetCustomer, BitgetTradeVolume};
use crate::core::errors::ExchangeError;
use crate::core::types::{conversion, Uid, VerificationResult};
use rust_decimal::Decimal;

/// Find `uid` in a customer list and normalize it
///
/// Only an exact UID match counts. A matching customer with an unparseable
/// registration time is still verified, with the time left unknown.
pub fn convert_customer_list(uid: &Uid, customers: Vec<BitgetCustomer>) -> VerificationResult {
    customers
        .into_iter()
        .find(|customer| customer.uid == uid.as_str())
        .map_or_else(
            || VerificationResult::not_verified(uid.clone(), "UID not found in customer list"),
            |customer| {
                let register_time = customer
                    .register_time
                    .as_ref()
                    .and_then(conversion::value_to_datetime);
                VerificationResult::verified(uid.clone(), register_time)
            },
        )
}

/// Sum the `volumn` field of every entry; bad values count as zero
pub fn sum_trade_volumes(entries: &[BitgetTradeVolume]) -> Result<Decimal, ExchangeError> {
    conversion::checked_volume_sum(
        entries
            .iter()
            .map(|entry| conversion::value_to_volume(entry.volumn.as_ref())),
    )
    .ok_or_else(|| {
        ExchangeError::InvalidResponseFormat(format!(
            "trade volume of {} entries overflows",
            entries.len()
        ))
    })
}
