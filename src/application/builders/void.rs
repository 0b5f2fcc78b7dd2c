use super::INVALID_TRANSACTION_ID;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::element::Element;
use crate::domain::response::TransactionResponse;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;

pub struct VoidBuilder<'a> {
    service: &'a CreditService,
    transaction_id: i64,
    client_transaction_id: Option<String>,
}

impl<'a> VoidBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, transaction_id: i64) -> Self {
        Self {
            service,
            transaction_id,
            client_transaction_id: None,
        }
    }

    pub fn with_client_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.client_transaction_id = Some(id.into());
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;
        let mut transaction = Element::new(TransactionKind::CreditVoid.tag());
        Element::sub_text(&mut transaction, "GatewayTxnId", self.transaction_id.to_string());
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<TransactionResponse> {
        let kind = TransactionKind::CreditVoid;
        let request = self.build()?;
        let response = self
            .service
            .submit(request, kind, self.client_transaction_id)
            .await?;
        Ok(TransactionResponse::from_tree(&response, kind)?.normalized())
    }
}

impl Validated for VoidBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add_request_check("transaction_id_is_positive", INVALID_TRANSACTION_ID, |b| {
            b.transaction_id > 0
        });
    }
}
