use super::{AMOUNT_POSITIVE, INVALID_TRANSACTION_ID, amount_positive};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::element::Element;
use crate::domain::market::DirectMarketData;
use crate::domain::response::TransactionResponse;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Adds a prior authorization to the open batch (`CreditAddToBatch`).
pub struct CaptureBuilder<'a> {
    service: &'a CreditService,
    transaction_id: i64,
    amount: Option<Decimal>,
    gratuity: Option<Decimal>,
    direct_market_data: Option<DirectMarketData>,
    client_transaction_id: Option<String>,
}

impl<'a> CaptureBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, transaction_id: i64) -> Self {
        Self {
            service,
            transaction_id,
            amount: None,
            gratuity: None,
            direct_market_data: None,
            client_transaction_id: None,
        }
    }

    /// Overrides the authorized amount.
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_gratuity(mut self, gratuity: Decimal) -> Self {
        self.gratuity = Some(gratuity);
        self
    }

    pub fn with_direct_market_data(mut self, data: DirectMarketData) -> Self {
        self.direct_market_data = Some(data);
        self
    }

    pub fn with_client_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.client_transaction_id = Some(id.into());
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::CreditAddToBatch.tag());
        Element::sub_text(&mut transaction, "GatewayTxnId", self.transaction_id.to_string());
        Element::sub_text_opt(&mut transaction, "Amt", self.amount);
        Element::sub_text_opt(&mut transaction, "GratuityAmtInfo", self.gratuity);
        if let Some(data) = &self.direct_market_data {
            transaction.append(hydrate::direct_market_data(data));
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<TransactionResponse> {
        let kind = TransactionKind::CreditAddToBatch;
        let request = self.build()?;
        let response = self
            .service
            .submit(request, kind, self.client_transaction_id)
            .await?;
        Ok(TransactionResponse::from_tree(&response, kind)?.normalized())
    }
}

impl Validated for CaptureBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add_request_check("transaction_id_is_positive", INVALID_TRANSACTION_ID, |b| {
            b.transaction_id > 0
        });
        rules.add("amount_is_positive", AMOUNT_POSITIVE, |b| amount_positive(b.amount));
        rules.add(
            "gratuity_is_positive",
            "Gratuity must be greater than 0.",
            |b| amount_positive(b.gratuity),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::application::service::CreditService;
    use crate::config::ServicesConfig;
    use crate::domain::market::DirectMarketData;
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
    fn test_capture_layout() {
        let service = service();
        let request = service
            .capture(1234)
            .with_amount(dec!(12.50))
            .with_gratuity(dec!(2.00))
            .with_direct_market_data(DirectMarketData::new("INV-1", 3, 4))
            .build()
            .unwrap();
        let tags: Vec<_> = request.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["GatewayTxnId", "Amt", "GratuityAmtInfo", "DirectMktData"]);
        assert_eq!(request.get_string("GratuityAmtInfo").unwrap(), "2.00");
    }

    #[test]
    fn test_capture_rejects_non_positive_id() {
        let err = service().capture(0).build().unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequestError(_)));
    }

    #[test]
    fn test_capture_rejects_negative_gratuity() {
        let err = service()
            .capture(5)
            .with_gratuity(dec!(-1))
            .build()
            .unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(_)));
    }
}
