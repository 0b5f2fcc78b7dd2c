use super::{
    AMOUNT_POSITIVE, AMOUNT_REQUIRED, CURRENCY_REQUIRED, CURRENCY_UNSUPPORTED, amount_positive,
    currency_supported,
};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::card::GiftCard;
use crate::domain::element::Element;
use crate::domain::response::GiftCardResponse;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Activates a gift card with an initial balance (`GiftCardActivate`).
pub struct GiftCardActivateBuilder<'a> {
    service: &'a CreditService,
    amount: Option<Decimal>,
    card: Option<GiftCard>,
    currency: Option<String>,
}

impl<'a> GiftCardActivateBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, amount: Option<Decimal>) -> Self {
        Self {
            service,
            amount,
            card: None,
            currency: None,
        }
    }

    pub fn with_card(mut self, card: GiftCard) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::GiftCardActivate.tag());
        let block1 = Element::sub_element(&mut transaction, "Block1");
        Element::sub_text_opt(block1, "Amt", self.amount);
        if let Some(card) = &self.card {
            block1.append(hydrate::gift_card_data(card));
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<GiftCardResponse> {
        let request = self.build()?;
        let response = self
            .service
            .submit(request, TransactionKind::GiftCardActivate, None)
            .await?;
        Ok(GiftCardResponse::from_tree(&response)?)
    }
}

impl Validated for GiftCardActivateBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add("amount_is_not_null", AMOUNT_REQUIRED, |b| b.amount.is_some());
        rules.add("card_is_not_null", "Card is required.", |b| b.card.is_some());
        rules.add("currency_is_not_null", CURRENCY_REQUIRED, |b| b.currency.is_some());
        rules.add("amount_is_positive", AMOUNT_POSITIVE, |b| amount_positive(b.amount));
        rules.add("currency_is_supported", CURRENCY_UNSUPPORTED, |b| {
            currency_supported(b.currency.as_deref())
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::application::service::CreditService;
    use crate::config::ServicesConfig;
    use crate::domain::card::GiftCard;
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
    fn test_activate_layout() {
        let service = service();
        let request = service
            .gift_card_activate(dec!(25.00))
            .with_card(GiftCard::Number("5022440000000000098".into()))
            .with_currency("usd")
            .build()
            .unwrap();
        let block1 = request.child("Block1").unwrap();
        assert_eq!(block1.get_string("Amt").unwrap(), "25.00");
        assert_eq!(
            block1.at(&["CardData", "CardNbr"]).unwrap().text_value(),
            Some("5022440000000000098")
        );
    }

    #[test]
    fn test_activate_without_card() {
        let err = service()
            .gift_card_activate(dec!(25.00))
            .with_currency("usd")
            .build()
            .unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m == "Card is required."));
    }
}
