//! Pure mappings from domain inputs to request fragments.
//!
//! Absent optional fields are left out of the fragment entirely; nothing here
//! ever emits an empty placeholder element for a `None`.

use crate::domain::card::{CardHolder, CreditCard, EncryptionData, GiftCard};
use crate::domain::element::Element;
use crate::domain::market::{CpcData, DirectMarketData, TransactionDetails};
use crate::domain::payment_data::{PAYMENT_DATA_SOURCE, PaymentData};

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

pub fn manual_entry(card: &CreditCard, card_present: bool, reader_present: bool) -> Element {
    let mut entry = Element::new("ManualEntry");
    Element::sub_text(&mut entry, "CardNbr", card.number.as_str());
    Element::sub_text(&mut entry, "ExpMonth", card.exp_month.to_string());
    Element::sub_text(&mut entry, "ExpYear", card.exp_year.to_string());
    Element::sub_text_opt(&mut entry, "CVV2", card.cvv.as_deref());
    Element::sub_text(&mut entry, "CardPresent", yes_no(card_present));
    Element::sub_text(&mut entry, "ReaderPresent", yes_no(reader_present));
    entry
}

/// Manual entry derived from decrypted wallet data. The card is never present.
pub fn payment_data_entry(data: &PaymentData) -> Element {
    let mut entry = Element::new("ManualEntry");
    Element::sub_text(&mut entry, "CardNbr", data.account_number());
    Element::sub_text(&mut entry, "ExpMonth", data.exp_month());
    Element::sub_text(&mut entry, "ExpYear", data.exp_year());
    entry
}

pub fn token_data(token: &str, card_present: bool, reader_present: bool) -> Element {
    let mut data = Element::new("TokenData");
    Element::sub_text(&mut data, "TokenValue", token);
    Element::sub_text(&mut data, "CardPresent", yes_no(card_present));
    Element::sub_text(&mut data, "ReaderPresent", yes_no(reader_present));
    data
}

pub fn card_holder_data(holder: &CardHolder) -> Element {
    let mut data = Element::new("CardHolderData");
    Element::sub_text_opt(&mut data, "CardHolderFirstName", holder.first_name.as_deref());
    Element::sub_text_opt(&mut data, "CardHolderLastName", holder.last_name.as_deref());
    Element::sub_text_opt(&mut data, "CardHolderPhone", holder.phone.as_deref());
    Element::sub_text_opt(&mut data, "CardHolderEmail", holder.email.as_deref());
    if let Some(address) = &holder.address {
        Element::sub_text_opt(&mut data, "CardHolderAddr", address.address.as_deref());
        Element::sub_text_opt(&mut data, "CardHolderCity", address.city.as_deref());
        Element::sub_text_opt(&mut data, "CardHolderState", address.state.as_deref());
        Element::sub_text_opt(&mut data, "CardHolderZip", address.zip.as_deref());
    }
    data
}

pub fn encryption_data(data: &EncryptionData) -> Element {
    let mut el = Element::new("EncryptionData");
    Element::sub_text(&mut el, "Version", data.version.as_str());
    Element::sub_text_opt(&mut el, "EncryptedTrackNumber", data.encrypted_track_number.as_deref());
    Element::sub_text_opt(&mut el, "KTB", data.ktb.as_deref());
    Element::sub_text_opt(&mut el, "KSN", data.ksn.as_deref());
    el
}

pub fn direct_market_data(data: &DirectMarketData) -> Element {
    let mut el = Element::new("DirectMktData");
    Element::sub_text_opt(&mut el, "DirectMktInvoiceNbr", data.invoice_number.as_deref());
    Element::sub_text_opt(&mut el, "DirectMktShipMonth", data.ship_month);
    Element::sub_text_opt(&mut el, "DirectMktShipDay", data.ship_day);
    el
}

/// `None` when the details carry none of the wire fields.
pub fn additional_txn_fields(details: &TransactionDetails) -> Option<Element> {
    if details.memo.is_none() && details.invoice_number.is_none() && details.customer_id.is_none()
    {
        return None;
    }
    let mut el = Element::new("AdditionalTxnFields");
    Element::sub_text_opt(&mut el, "Description", details.memo.as_deref());
    Element::sub_text_opt(&mut el, "InvoiceNbr", details.invoice_number.as_deref());
    Element::sub_text_opt(&mut el, "CustomerID", details.customer_id.as_deref());
    Some(el)
}

pub fn cpc_data(data: &CpcData) -> Element {
    let mut el = Element::new("CPCData");
    Element::sub_text_opt(&mut el, "CardHolderPONbr", data.po_number());
    Element::sub_text_opt(&mut el, "TaxType", data.tax_type().map(|t| t.as_wire()));
    Element::sub_text_opt(&mut el, "TaxAmt", data.tax_amount());
    el
}

pub fn secure_ecommerce(data: &PaymentData) -> Element {
    let mut el = Element::new("SecureECommerce");
    Element::sub_text(&mut el, "PaymentDataSource", PAYMENT_DATA_SOURCE);
    Element::sub_text(&mut el, "TypeOfPaymentData", data.payment_data_type());
    Element::sub_text(&mut el, "PaymentData", data.cryptogram());
    Element::sub_text_opt(&mut el, "ECommerceIndicator", data.eci_indicator());
    el
}

pub fn gift_card_data(card: &GiftCard) -> Element {
    let mut el = Element::new("CardData");
    match card {
        GiftCard::Number(number) => Element::sub_text(&mut el, "CardNbr", number.as_str()),
        GiftCard::TrackData(track) => Element::sub_text(&mut el, "TrackData", track.as_str()),
        GiftCard::Token(token) => Element::sub_text(&mut el, "TokenValue", token.as_str()),
    }
    el
}
