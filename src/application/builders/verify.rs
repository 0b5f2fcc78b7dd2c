use super::{PaymentMethod, Presence, card_data};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::card::{CardHolder, CreditCard};
use crate::domain::element::Element;
use crate::domain::response::AccountVerify;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;

/// Zero-amount account verification (`CreditAccountVerify`).
pub struct VerifyBuilder<'a> {
    service: &'a CreditService,
    payment: Option<PaymentMethod>,
    card_holder: Option<CardHolder>,
    request_multi_use_token: bool,
    presence: Presence,
    client_transaction_id: Option<String>,
}

impl<'a> VerifyBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService) -> Self {
        Self {
            service,
            payment: None,
            card_holder: None,
            request_multi_use_token: false,
            presence: Presence::default(),
            client_transaction_id: None,
        }
    }

    pub fn with_card(mut self, card: CreditCard) -> Self {
        self.payment = Some(PaymentMethod::Card(card));
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.payment = Some(PaymentMethod::Token(token.into()));
        self
    }

    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.card_holder = Some(holder);
        self
    }

    pub fn with_request_multi_use_token(mut self, request: bool) -> Self {
        self.request_multi_use_token = request;
        self
    }

    pub fn with_card_present(mut self, present: bool) -> Self {
        self.presence.card_present = present;
        self
    }

    pub fn with_reader_present(mut self, present: bool) -> Self {
        self.presence.reader_present = present;
        self
    }

    pub fn with_client_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.client_transaction_id = Some(id.into());
        self
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(TransactionKind::CreditAccountVerify.tag());
        let block1 = Element::sub_element(&mut transaction, "Block1");
        if let Some(holder) = &self.card_holder {
            block1.append(hydrate::card_holder_data(holder));
        }
        if let Some(method) = &self.payment {
            block1.append(card_data(method, self.presence, self.request_multi_use_token));
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<AccountVerify> {
        let kind = TransactionKind::CreditAccountVerify;
        let request = self.build()?;
        let response = self
            .service
            .submit(request, kind, self.client_transaction_id)
            .await?;
        Ok(AccountVerify::from_tree(&response, kind)?)
    }
}

impl Validated for VerifyBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add(
            "card_or_token_is_not_null",
            "Card or token is required.",
            |b| matches!(b.payment, Some(PaymentMethod::Card(_) | PaymentMethod::Token(_))),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ServicesConfig;
    use crate::application::service::CreditService;
    use crate::domain::card::{CardHolder, CreditCard};
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::ScriptedTransport;

    fn service() -> CreditService {
        CreditService::new(
            ServicesConfig::with_secret_api_key("skapi_cert_test"),
            Box::new(ScriptedTransport::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_layout() {
        let service = service();
        let request = service
            .verify()
            .with_card(CreditCard::new("4012002000060016", 12, 2025))
            .with_card_holder(CardHolder::new().with_name("Bill", "Johnson"))
            .with_request_multi_use_token(true)
            .build()
            .unwrap();
        let block1 = request.child("Block1").unwrap();
        let tags: Vec<_> = block1.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["CardHolderData", "CardData"]);
        assert!(block1.get_string("Amt").is_err());
        assert_eq!(
            block1.at(&["CardData", "TokenRequest"]).unwrap().text_value(),
            Some("Y")
        );
    }

    #[test]
    fn test_verify_requires_card_or_token() {
        let err = service().verify().build().unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(_)));
    }
}
