use super::INVALID_TRANSACTION_ID;
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::element::Element;
use crate::domain::market::CpcData;
use crate::domain::response::TransactionResponse;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;

/// Attaches commercial-card (level II) data to a settled sale.
pub struct CpcEditBuilder<'a> {
    service: &'a CreditService,
    transaction_id: i64,
    cpc_data: Option<CpcData>,
}

impl<'a> CpcEditBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, transaction_id: i64) -> Self {
        Self {
            service,
            transaction_id,
            cpc_data: None,
        }
    }

    pub fn with_cpc_data(mut self, data: CpcData) -> Self {
        self.cpc_data = Some(data);
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;
        let mut transaction = Element::new(TransactionKind::CreditCpcEdit.tag());
        Element::sub_text(&mut transaction, "GatewayTxnId", self.transaction_id.to_string());
        if let Some(data) = &self.cpc_data {
            transaction.append(hydrate::cpc_data(data));
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<TransactionResponse> {
        let kind = TransactionKind::CreditCpcEdit;
        let request = self.build()?;
        let response = self.service.submit(request, kind, None).await?;
        Ok(TransactionResponse::from_tree(&response, kind)?.normalized())
    }
}

impl Validated for CpcEditBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add_request_check("transaction_id_is_positive", INVALID_TRANSACTION_ID, |b| {
            b.transaction_id > 0
        });
        rules.add("cpc_data_is_not_null", "CPC data is required.", |b| {
            b.cpc_data.is_some()
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::application::service::CreditService;
    use crate::config::ServicesConfig;
    use crate::domain::market::{CpcData, TaxType};
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
    fn test_cpc_edit_layout() {
        let data = CpcData::new()
            .with_po_number("PO-77")
            .unwrap()
            .with_tax_type(TaxType::TaxExempt)
            .with_tax_amount(dec!(0.00))
            .unwrap();
        let service = service();
        let request = service.cpc_edit(99).with_cpc_data(data).build().unwrap();
        assert_eq!(request.tag(), "CreditCPCEdit");
        assert_eq!(request.get_int("GatewayTxnId").unwrap(), 99);
        assert_eq!(
            request.at(&["CPCData", "TaxType"]).unwrap().text_value(),
            Some("TAXEXEMPT")
        );
    }

    #[test]
    fn test_cpc_edit_requires_data() {
        let err = service().cpc_edit(99).build().unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m == "CPC data is required."));
    }
}
