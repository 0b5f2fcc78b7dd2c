#![allow(dead_code)]

use credit_gateway::application::service::CreditService;
use credit_gateway::config::ServicesConfig;
use credit_gateway::domain::card::CreditCard;
use credit_gateway::domain::element::{Element, ElementTree};
use credit_gateway::infrastructure::in_memory::{ScriptedTransport, response_document};
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const CSV_HEADER: [&str; 13] = [
    "op",
    "amount",
    "currency",
    "card_number",
    "exp_month",
    "exp_year",
    "cvv",
    "token",
    "transaction_id",
    "allow_duplicates",
    "po_number",
    "tax_type",
    "tax_amount",
];

pub fn visa() -> CreditCard {
    CreditCard::new("4012002000060016", 12, 2025).with_cvv("123")
}

/// Service over a scripted transport; the returned handle shares its queue.
pub fn scripted_service() -> (CreditService, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let service = CreditService::new(
        ServicesConfig::with_secret_api_key("skapi_cert_test"),
        Box::new(transport.clone()),
    )
    .unwrap();
    (service, transport)
}

/// A same-tag body with issuer response fields.
pub fn body(tag: &str, rsp_code: &str, rsp_text: &str) -> Element {
    let mut body = Element::new(tag);
    Element::sub_text(&mut body, "RspCode", rsp_code);
    Element::sub_text(&mut body, "RspText", rsp_text);
    body
}

pub fn approved(tag: &str, transaction_id: i64) -> ElementTree {
    response_document(
        transaction_id,
        "0",
        "Success",
        None,
        Some(body(tag, "00", "APPROVAL")),
    )
}

pub fn gateway_failure(code: &str, transaction_id: i64) -> ElementTree {
    response_document(transaction_id, code, "Failure", None, None)
}

pub fn issuer_response(tag: &str, transaction_id: i64, code: &str, text: &str) -> ElementTree {
    response_document(transaction_id, "0", "Success", None, Some(body(tag, code, text)))
}

pub fn generate_csv(path: &Path, rows: &[[&str; 13]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
