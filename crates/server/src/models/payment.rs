//! Received-amount request bodies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /api/{collection}/{id}/received-amounts`.
///
/// `amount` accepts a JSON number or a numeric string. A missing `date`
/// means the payment was received today.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedAmountRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_amount_as_string_or_number() {
        let from_number: ReceivedAmountRequest =
            serde_json::from_value(json!({ "amount": 1500, "date": "2024-05-02" })).unwrap();
        assert_eq!(from_number.amount, dec!(1500));
        assert_eq!(from_number.date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert!(from_number.description.is_empty());

        let from_string: ReceivedAmountRequest =
            serde_json::from_value(json!({ "amount": "250.75", "description": "cheque" }))
                .unwrap();
        assert_eq!(from_string.amount, dec!(250.75));
        assert!(from_string.date.is_none());
    }

    #[test]
    fn test_amount_required() {
        assert!(serde_json::from_value::<ReceivedAmountRequest>(json!({ "date": "2024-05-02" })).is_err());
    }
}
