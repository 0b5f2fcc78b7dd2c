use super::{
    AMOUNT_POSITIVE, AMOUNT_REQUIRED, CURRENCY_REQUIRED, CURRENCY_UNSUPPORTED,
    INVALID_TRANSACTION_ID, Original, amount_positive, currency_supported,
};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::card::CreditCard;
use crate::domain::element::Element;
use crate::domain::market::TransactionDetails;
use crate::domain::response::Reversal;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Reverses an authorization (`CreditReversal`).
///
/// A reversal is never itself compensated: its response is classified
/// without the timeout branch.
pub struct ReverseBuilder<'a> {
    service: &'a CreditService,
    amount: Option<Decimal>,
    currency: Option<String>,
    original: Option<Original>,
    details: Option<TransactionDetails>,
}

impl<'a> ReverseBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, amount: Option<Decimal>) -> Self {
        Self {
            service,
            amount,
            currency: None,
            original: None,
            details: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_card(mut self, card: CreditCard) -> Self {
        self.original = Some(Original::Card(card));
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: i64) -> Self {
        self.original = Some(Original::TransactionId(transaction_id));
        self
    }

    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::CreditReversal.tag());
        let block1 = Element::sub_element(&mut transaction, "Block1");
        Element::sub_text_opt(block1, "Amt", self.amount);
        if let Some(original) = &self.original {
            original.hydrate_into(block1);
        }
        if let Some(fields) = self.details.as_ref().and_then(hydrate::additional_txn_fields) {
            block1.append(fields);
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<Reversal> {
        let request = self.build()?;
        let client_txn_id = self
            .details
            .as_ref()
            .and_then(|d| d.client_transaction_id.clone());
        let response = self.service.submit_reversal(request, client_txn_id).await?;
        Ok(Reversal::from_tree(&response)?)
    }
}

impl Validated for ReverseBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add("amount_is_not_null", AMOUNT_REQUIRED, |b| b.amount.is_some());
        rules.add("amount_is_positive", AMOUNT_POSITIVE, |b| amount_positive(b.amount));
        rules.add("currency_is_not_null", CURRENCY_REQUIRED, |b| b.currency.is_some());
        rules.add("currency_is_supported", CURRENCY_UNSUPPORTED, |b| {
            currency_supported(b.currency.as_deref())
        });
        rules.add(
            "card_or_transaction_id_is_not_null",
            "Card or transaction id is required.",
            |b| b.original.is_some(),
        );
        rules.add_request_check("transaction_id_is_positive", INVALID_TRANSACTION_ID, |b| {
            Original::has_valid_id(b.original.as_ref())
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::application::service::CreditService;
    use crate::config::ServicesConfig;
    use crate::domain::market::TransactionDetails;
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::ScriptedTransport;
    use rust_decimal_macros::dec;

    fn service() -> CreditService {
        CreditService::new(
            ServicesConfig::with_secret_api_key("skapi_cert_test"),
            Box::new(ScriptedTransport::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_reverse_by_id_layout() {
        let service = service();
        let request = service
            .reverse(dec!(50.00))
            .with_currency("usd")
            .with_transaction_id(77)
            .with_details(TransactionDetails::new().with_customer_id("C-1"))
            .build()
            .unwrap();
        let block1 = request.child("Block1").unwrap();
        let tags: Vec<_> = block1.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["Amt", "GatewayTxnId", "AdditionalTxnFields"]);
    }

    #[test]
    fn test_reverse_without_amount_fails() {
        let err = service()
            .reverse(None)
            .with_currency("usd")
            .with_transaction_id(77)
            .build()
            .unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m == "Amount is required."));
    }
}
