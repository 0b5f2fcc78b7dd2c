use super::{
    AMOUNT_POSITIVE, AMOUNT_REQUIRED, CURRENCY_REQUIRED, CURRENCY_UNSUPPORTED, PaymentMethod,
    Presence, amount_positive, card_data, currency_supported,
};
use crate::application::hydrate;
use crate::application::service::CreditService;
use crate::application::validation::{Validated, ValidationSet};
use crate::domain::card::{CardHolder, CreditCard};
use crate::domain::currency::SUPPORTED_CURRENCY;
use crate::domain::element::Element;
use crate::domain::market::{DirectMarketData, TransactionDetails};
use crate::domain::response::Authorization;
use crate::domain::transaction::TransactionKind;
use crate::error::Result;
use rust_decimal::Decimal;

/// Builds a `CreditSale` or `CreditAuth`.
///
/// Both operations share the same `Block1` layout; only a sale carries
/// direct-marketing data.
pub struct AuthorizationBuilder<'a> {
    service: &'a CreditService,
    kind: TransactionKind,
    amount: Option<Decimal>,
    currency: Option<String>,
    payment: Option<PaymentMethod>,
    card_holder: Option<CardHolder>,
    allow_duplicates: bool,
    request_multi_use_token: bool,
    presence: Presence,
    descriptor: Option<String>,
    details: Option<TransactionDetails>,
    direct_market_data: Option<DirectMarketData>,
    cpc_request: bool,
}

pub type ChargeBuilder<'a> = AuthorizationBuilder<'a>;
pub type AuthorizeBuilder<'a> = AuthorizationBuilder<'a>;

impl<'a> AuthorizationBuilder<'a> {
    pub(crate) fn new(service: &'a CreditService, kind: TransactionKind, amount: Option<Decimal>) -> Self {
        Self {
            service,
            kind,
            amount,
            currency: None,
            payment: None,
            card_holder: None,
            allow_duplicates: false,
            request_multi_use_token: false,
            presence: Presence::default(),
            descriptor: None,
            details: None,
            direct_market_data: None,
            cpc_request: false,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<PaymentMethod>) -> Self {
        self.payment = Some(method.into());
        self
    }

    pub fn with_card(self, card: CreditCard) -> Self {
        self.with_payment_method(PaymentMethod::Card(card))
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_payment_method(PaymentMethod::Token(token.into()))
    }

    pub fn with_card_holder(mut self, holder: CardHolder) -> Self {
        self.card_holder = Some(holder);
        self
    }

    pub fn with_allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
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

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_direct_market_data(mut self, data: DirectMarketData) -> Self {
        self.direct_market_data = Some(data);
        self
    }

    pub fn with_cpc_request(mut self, request: bool) -> Self {
        self.cpc_request = request;
        self
    }

    /// Explicit amount, falling back to the wallet payload's amount.
    fn effective_amount(&self) -> Option<Decimal> {
        match (&self.amount, &self.payment) {
            (Some(amount), _) => Some(*amount),
            (None, Some(PaymentMethod::PaymentData(data))) => Some(data.dollar_amount()),
            _ => None,
        }
    }

    fn effective_currency(&self) -> Option<&str> {
        match (&self.currency, &self.payment) {
            (Some(currency), _) => Some(currency.as_str()),
            (None, Some(PaymentMethod::PaymentData(_))) => Some(SUPPORTED_CURRENCY),
            _ => None,
        }
    }

    pub fn build(&self) -> Result<Element> {
        self.validate()?;

        let mut transaction = Element::new(self.kind.tag());
        let block1 = Element::sub_element(&mut transaction, "Block1");
        Element::sub_text(block1, "AllowDup", hydrate::yes_no(self.allow_duplicates));
        Element::sub_text_opt(block1, "Amt", self.effective_amount());

        if let Some(holder) = &self.card_holder {
            block1.append(hydrate::card_holder_data(holder));
        }
        if let Some(method) = &self.payment {
            block1.append(card_data(method, self.presence, self.request_multi_use_token));
            if let PaymentMethod::PaymentData(data) = method {
                block1.append(hydrate::secure_ecommerce(data));
            }
        }
        if self.cpc_request {
            Element::sub_text(block1, "CPCReq", "Y");
        }
        Element::sub_text_opt(block1, "TxnDescriptor", self.descriptor.as_deref());
        if let Some(fields) = self.details.as_ref().and_then(hydrate::additional_txn_fields) {
            block1.append(fields);
        }
        if self.kind == TransactionKind::CreditSale
            && let Some(data) = &self.direct_market_data
        {
            block1.append(hydrate::direct_market_data(data));
        }
        Ok(transaction)
    }

    pub async fn execute(self) -> Result<Authorization> {
        let request = self.build()?;
        let client_txn_id = self
            .details
            .as_ref()
            .and_then(|d| d.client_transaction_id.clone());
        let response = self.service.submit(request, self.kind, client_txn_id).await?;
        Ok(Authorization::from_tree(&response, self.kind)?)
    }
}

impl Validated for AuthorizationBuilder<'_> {
    fn setup_validations(rules: &mut ValidationSet<Self>) {
        rules.add("amount_is_not_null", AMOUNT_REQUIRED, |b| {
            b.effective_amount().is_some()
        });
        rules.add("amount_is_positive", AMOUNT_POSITIVE, |b| {
            amount_positive(b.effective_amount())
        });
        rules.add("currency_is_not_null", CURRENCY_REQUIRED, |b| {
            b.effective_currency().is_some()
        });
        rules.add("currency_is_supported", CURRENCY_UNSUPPORTED, |b| {
            currency_supported(b.effective_currency())
        });
        rules.add(
            "payment_method_is_not_null",
            "Card, token or payment data is required.",
            |b| b.payment.is_some(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServicesConfig;
    use crate::domain::card::Address;
    use crate::domain::payment_data::PaymentData;
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

    fn tags(el: &Element) -> Vec<&str> {
        el.children().iter().map(|c| c.tag()).collect()
    }

    #[test]
    fn test_sale_block1_layout() {
        let service = service();
        let request = service
            .charge(dec!(50.00))
            .with_currency("usd")
            .with_card(CreditCard::new("4012002000060016", 12, 2025).with_cvv("123"))
            .with_card_holder(CardHolder::new().with_address(Address {
                zip: Some("75024".into()),
                ..Address::default()
            }))
            .with_allow_duplicates(true)
            .with_cpc_request(true)
            .with_descriptor("Acme")
            .with_details(TransactionDetails::new().with_memo("memo"))
            .with_direct_market_data(DirectMarketData::new("INV-9", 1, 12))
            .build()
            .unwrap();

        assert_eq!(request.tag(), "CreditSale");
        let block1 = request.child("Block1").unwrap();
        assert_eq!(
            tags(block1),
            [
                "AllowDup",
                "Amt",
                "CardHolderData",
                "CardData",
                "CPCReq",
                "TxnDescriptor",
                "AdditionalTxnFields",
                "DirectMktData"
            ]
        );
        assert_eq!(block1.get_string("Amt").unwrap(), "50.00");
    }

    #[test]
    fn test_auth_never_carries_direct_market_data() {
        let service = service();
        let request = service
            .authorize(dec!(10))
            .with_currency("USD")
            .with_token("supt_abc")
            .with_direct_market_data(DirectMarketData::new("INV-9", 1, 12))
            .build()
            .unwrap();
        assert_eq!(request.tag(), "CreditAuth");
        assert!(!request.child("Block1").unwrap().has("DirectMktData"));
    }

    #[test]
    fn test_payment_data_supplies_amount_and_currency() {
        let service = service();
        let data = PaymentData::new("4012002000060016", "251231", 1050, "crypto").unwrap();
        let request = service.charge(None).with_payment_method(data).build().unwrap();
        let block1 = request.child("Block1").unwrap();
        assert_eq!(block1.get_string("Amt").unwrap(), "10.50");
        assert!(block1.has("SecureECommerce"));
        assert_eq!(
            block1.at(&["CardData", "ManualEntry", "ExpYear"]).unwrap().text_value(),
            Some("2025")
        );
    }

    #[test]
    fn test_rules_run_in_order() {
        let service = service();
        let err = service.charge(None).build().unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m == AMOUNT_REQUIRED));

        let err = service.charge(dec!(5)).build().unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m == CURRENCY_REQUIRED));

        let err = service
            .charge(dec!(5))
            .with_currency("usd")
            .build()
            .unwrap_err();
        assert!(matches!(err, PaymentError::ValidationError(m) if m.starts_with("Card")));
    }
}
