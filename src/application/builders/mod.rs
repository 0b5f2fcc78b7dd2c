//! One builder per gateway operation.
//!
//! Builders are obtained from [`CreditService`](super::service::CreditService),
//! configured with `with_*` setters and consumed by `execute`. `build` runs
//! the same validation and assembly without submitting.

pub mod authorization;
pub mod capture;
pub mod cpc_edit;
pub mod edit;
pub mod gift_card;
pub mod refund;
pub mod reverse;
pub mod verify;
pub mod void;

pub use authorization::{AuthorizationBuilder, AuthorizeBuilder, ChargeBuilder};
pub use capture::CaptureBuilder;
pub use cpc_edit::CpcEditBuilder;
pub use edit::EditBuilder;
pub use gift_card::GiftCardActivateBuilder;
pub use refund::RefundBuilder;
pub use reverse::ReverseBuilder;
pub use verify::VerifyBuilder;
pub use void::VoidBuilder;

use super::hydrate;
use crate::domain::card::CreditCard;
use crate::domain::currency::is_supported_currency;
use crate::domain::element::Element;
use crate::domain::payment_data::PaymentData;
use rust_decimal::Decimal;

pub(crate) const AMOUNT_REQUIRED: &str = "Amount is required.";
pub(crate) const AMOUNT_POSITIVE: &str = "Amount must be greater than 0.";
pub(crate) const CURRENCY_REQUIRED: &str = "Currency is required.";
pub(crate) const CURRENCY_UNSUPPORTED: &str = "The only supported currency is \"usd\".";
pub(crate) const INVALID_TRANSACTION_ID: &str = "Invalid transaction id.";

/// How the card is presented to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethod {
    Card(CreditCard),
    Token(String),
    /// Decrypted wallet data; also supplies the amount when none is set.
    PaymentData(PaymentData),
}

impl From<CreditCard> for PaymentMethod {
    fn from(card: CreditCard) -> Self {
        PaymentMethod::Card(card)
    }
}

impl From<PaymentData> for PaymentMethod {
    fn from(data: PaymentData) -> Self {
        PaymentMethod::PaymentData(data)
    }
}

/// What a refund or reversal refers to: the card itself or the gateway id of
/// the original transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Original {
    Card(CreditCard),
    TransactionId(i64),
}

impl Original {
    pub(crate) fn has_valid_id(original: Option<&Original>) -> bool {
        !matches!(original, Some(Original::TransactionId(id)) if *id <= 0)
    }

    /// Appends `CardData/ManualEntry` or `GatewayTxnId` to `block1`.
    pub(crate) fn hydrate_into(&self, block1: &mut Element) {
        match self {
            Original::Card(card) => {
                let card_data = Element::sub_element(block1, "CardData");
                card_data.append(hydrate::manual_entry(card, false, false));
            }
            Original::TransactionId(id) => {
                Element::sub_text(block1, "GatewayTxnId", id.to_string());
            }
        }
    }
}

/// Presence flags sent alongside manual entry and token data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub card_present: bool,
    pub reader_present: bool,
}

/// `CardData` holding the method's entry, any encryption data and the
/// `TokenRequest` flag.
pub(crate) fn card_data(method: &PaymentMethod, presence: Presence, request_token: bool) -> Element {
    let mut card_data = Element::new("CardData");
    match method {
        PaymentMethod::Card(card) => {
            card_data.append(hydrate::manual_entry(
                card,
                presence.card_present,
                presence.reader_present,
            ));
            if let Some(encryption) = &card.encryption_data {
                card_data.append(hydrate::encryption_data(encryption));
            }
        }
        PaymentMethod::Token(token) => {
            card_data.append(hydrate::token_data(
                token,
                presence.card_present,
                presence.reader_present,
            ));
        }
        PaymentMethod::PaymentData(data) => {
            card_data.append(hydrate::payment_data_entry(data));
        }
    }
    Element::sub_text(&mut card_data, "TokenRequest", hydrate::yes_no(request_token));
    card_data
}

pub(crate) fn amount_positive(amount: Option<Decimal>) -> bool {
    amount.is_none_or(|a| a > Decimal::ZERO)
}

pub(crate) fn currency_supported(currency: Option<&str>) -> bool {
    currency.is_none_or(is_supported_currency)
}
