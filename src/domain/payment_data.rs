//! Decrypted secure e-commerce (wallet) payment data.
//!
//! Decryption happens upstream; this type only carries the cleartext fields a
//! charge or authorization needs.

use crate::error::PaymentError;
use rust_decimal::Decimal;

pub const PAYMENT_DATA_SOURCE: &str = "ApplePay";

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentData {
    account_number: String,
    /// `YYMMDD`
    expiration_date: String,
    /// Minor units (cents).
    transaction_amount: i64,
    payment_data_type: String,
    online_payment_cryptogram: String,
    eci_indicator: Option<String>,
}

impl PaymentData {
    pub fn new(
        account_number: impl Into<String>,
        expiration_date: impl Into<String>,
        transaction_amount: i64,
        online_payment_cryptogram: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let expiration_date = expiration_date.into();
        if expiration_date.len() != 6 || !expiration_date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentError::ValidationError(
                "Expiration date must be formatted as YYMMDD.".to_string(),
            ));
        }
        let cryptogram = online_payment_cryptogram.into();
        if cryptogram.is_empty() {
            return Err(PaymentError::ValidationError(
                "Payment cryptogram is required.".to_string(),
            ));
        }

        Ok(Self {
            account_number: account_number.into(),
            expiration_date,
            transaction_amount,
            payment_data_type: "3DSecure".to_string(),
            online_payment_cryptogram: cryptogram,
            eci_indicator: None,
        })
    }

    pub fn with_eci_indicator(mut self, eci: impl Into<String>) -> Self {
        self.eci_indicator = Some(eci.into());
        self
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn exp_month(&self) -> &str {
        &self.expiration_date[2..4]
    }

    pub fn exp_year(&self) -> String {
        format!("20{}", &self.expiration_date[0..2])
    }

    pub fn dollar_amount(&self) -> Decimal {
        Decimal::new(self.transaction_amount, 2)
    }

    pub fn payment_data_type(&self) -> &str {
        &self.payment_data_type
    }

    pub fn cryptogram(&self) -> &str {
        &self.online_payment_cryptogram
    }

    pub fn eci_indicator(&self) -> Option<&str> {
        self.eci_indicator.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expiration_is_split_into_month_and_year() {
        let data = PaymentData::new("4111111111111111", "251231", 1550, "AgAAAAAAAIR8CQrXcIhbQAAAAAA=")
            .unwrap();
        assert_eq!(data.exp_month(), "12");
        assert_eq!(data.exp_year(), "2025");
        assert_eq!(data.dollar_amount(), dec!(15.50));
    }

    #[test]
    fn test_rejects_malformed_expiration() {
        assert!(PaymentData::new("4111111111111111", "2512", 100, "abc").is_err());
        assert!(PaymentData::new("4111111111111111", "25x231", 100, "abc").is_err());
        assert!(PaymentData::new("4111111111111111", "251231", 100, "").is_err());
    }
}
