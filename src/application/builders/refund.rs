use super::{
    AMOUNT_POSITIVE, AMOUNT_REQUIRED, CURRENCY_REQUIRED, CURRENCY_UNSUPPORTED,
    INVALID_TRANSACTION_ID, Original, amount_positive, currency_supported,
};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::card::{CardHolder, CreditCard};
use crate::domain::element::Element;
use crate::domain::market::TransactionDetails;
use crate::domain::response::Refund;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Returns funds to a card, either directly or against a prior transaction
/// (`CreditReturn`).
pub struct RefundBuilder<'a> {
    service: &'a CreditService,
    amount: Option<Decimal>,
    currency: Option<String>,
    original: Option<Original>,
    card_holder: Option<CardHolder>,
    details: Option<TransactionDetails>,
}

impl<'a> RefundBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, amount: Option<Decimal>) -> Self {
        Self {
            service,
            amount,
            currency: None,
            original: None,
            card_holder: None,
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

    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.card_holder = Some(holder);
        self
    }

    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::CreditReturn.tag());
        let block1 = Element::sub_element(&mut transaction, "Block1");
        Element::sub_text_opt(block1, "Amt", self.amount);
        if let Some(holder) = &self.card_holder {
            block1.append(hydrate::card_holder_data(holder));
        }
        if let Some(original) = &self.original {
            original.hydrate_into(block1);
        }
        if let Some(fields) = self.details.as_ref().and_then(hydrate::additional_txn_fields) {
            block1.append(fields);
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<Refund> {
        let kind = TransactionKind::CreditReturn;
        let request = self.build()?;
        let client_txn_id = self
            .details
            .as_ref()
            .and_then(|d| d.client_transaction_id.clone());
        let response = self.service.submit(request, kind, client_txn_id).await?;
        Ok(Refund::from_tree(&response, kind)?.normalized())
    }
}

impl Validated for RefundBuilder<'_> {
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
