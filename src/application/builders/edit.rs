use super::{AMOUNT_POSITIVE, AMOUNT_REQUIRED, INVALID_TRANSACTION_ID, amount_positive};
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::element::Element;
use crate::domain::response::TransactionResponse;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Adjusts the amount or gratuity of an open transaction (`CreditTxnEdit`).
pub struct EditBuilder<'a> {
    service: &'a CreditService,
    transaction_id: i64,
    amount: Option<Decimal>,
    gratuity: Option<Decimal>,
    client_transaction_id: Option<String>,
}

impl<'a> EditBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, transaction_id: i64) -> Self {
        Self {
            service,
            transaction_id,
            amount: None,
            gratuity: None,
            client_transaction_id: None,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_gratuity(mut self, gratuity: Decimal) -> Self {
        self.gratuity = Some(gratuity);
        self
    }

    pub fn with_client_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.client_transaction_id = Some(id.into());
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::CreditTxnEdit.tag());
        Element::sub_text(&mut transaction, "GatewayTxnId", self.transaction_id.to_string());
        Element::sub_text_opt(&mut transaction, "Amt", self.amount);
        Element::sub_text_opt(&mut transaction, "GratuityAmtInfo", self.gratuity);
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<TransactionResponse> {
        let kind = TransactionKind::CreditTxnEdit;
        let request = self.build()?;
        let response = self
            .service
            .submit(request, kind, self.client_transaction_id)
            .await?;
        Ok(TransactionResponse::from_tree(&response, kind)?.normalized())
    }
}

impl Validated for EditBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add_request_check("transaction_id_is_positive", INVALID_TRANSACTION_ID, |b| {
            b.transaction_id > 0
        });
        rules.add("amount_is_not_null", AMOUNT_REQUIRED, |b| b.amount.is_some());
        rules.add("amount_is_positive", AMOUNT_POSITIVE, |b| amount_positive(b.amount));
        rules.add(
            "gratuity_is_positive",
            "Gratuity must be greater than 0.",
            |b| amount_positive(b.gratuity),
        );
    }
}
