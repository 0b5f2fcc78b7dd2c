//! In-memory transports.
//!
//! [`ScriptedTransport`] replays canned responses and records what it was
//! sent; [`SimulatedGateway`] keeps transaction state and answers like a
//! gateway that approves everything it can find.

use crate::domain::element::{Element, ElementTree};
use crate::domain::ports::Transport;
use crate::domain::transaction::TransactionKind;
use crate::error::TransportError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// A request as seen by an in-memory transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub request: Element,
    pub client_txn_id: Option<String>,
}

type ScriptedResponse = Result<ElementTree, TransportError>;

/// Replays queued responses in order.
///
/// Clones share the same queue and log, so a test can keep one handle while
/// the service owns another.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_response(&self, response: ElementTree) {
        self.responses.lock().await.push_back(Ok(response));
    }

    pub async fn push_error(&self, error: TransportError) {
        self.responses.lock().await.push_back(Err(error));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(
        &self,
        request: &Element,
        client_txn_id: Option<&str>,
    ) -> Result<ElementTree, TransportError> {
        self.requests.lock().await.push(RecordedRequest {
            request: request.clone(),
            client_txn_id: client_txn_id.map(str::to_string),
        });
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response left".into())))
    }
}

/// Builds a response document: `PosResponse/Ver1.0/{Header, Transaction/<body>}`.
pub fn response_document(
    transaction_id: i64,
    gateway_code: &str,
    gateway_message: &str,
    client_txn_id: Option<&str>,
    body: Option<Element>,
) -> ElementTree {
    let mut root = Element::new("PosResponse");
    let version = Element::sub_element(&mut root, "Ver1.0");
    let header = Element::sub_element(version, "Header");
    Element::sub_text(header, "GatewayTxnId", transaction_id.to_string());
    Element::sub_text(header, "GatewayRspCode", gateway_code);
    Element::sub_text(header, "GatewayRspMsg", gateway_message);
    Element::sub_text_opt(header, "ClientTxnId", client_txn_id);
    if let Some(body) = body {
        Element::sub_element(version, "Transaction").append(body);
    }
    ElementTree::new(root)
}

#[derive(Debug, Clone)]
struct SimulatedTransaction {
    kind: TransactionKind,
    amount: Option<Decimal>,
    card_number: Option<String>,
    original_id: Option<i64>,
}

/// Stateful gateway stand-in.
///
/// Every request gets a fresh gateway id. Operations that refer to an
/// earlier transaction answer gateway code 3 when that id is unknown.
#[derive(Clone)]
pub struct SimulatedGateway {
    transactions: Arc<RwLock<BTreeMap<i64, SimulatedTransaction>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self {
            transactions: Arc::default(),
            next_id: Arc::new(AtomicI64::new(1_000_000)),
        }
    }
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn transaction_count(&self) -> usize {
        self.transactions.read().await.len()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn handle(&self, request: &Element, client_txn_id: Option<&str>) -> ElementTree {
        let id = self.next_id();
        let Some(kind) = TransactionKind::from_tag(request.tag()) else {
            return response_document(id, "1", "Unsupported transaction.", client_txn_id, None);
        };

        let original_id = request
            .get_int_opt("GatewayTxnId")
            .ok()
            .flatten()
            .or_else(|| request.at(&["Block1", "GatewayTxnId"]).and_then(parse_int))
            .or_else(|| request.get_int_opt("TxnId").ok().flatten());

        if let Some(original) = original_id
            && !self.transactions.read().await.contains_key(&original)
        {
            return response_document(
                id,
                "3",
                "Transaction rejected because the referenced original transaction is invalid.",
                client_txn_id,
                None,
            );
        }

        let body = match kind {
            TransactionKind::ReportTxnDetail => match original_id {
                Some(original) => self.detail_report(original).await,
                None => return response_document(id, "1", "TxnId required.", client_txn_id, None),
            },
            TransactionKind::ReportActivity => self.activity_report().await,
            _ => {
                let amount = request
                    .at(&["Block1", "Amt"])
                    .or_else(|| request.child("Amt"))
                    .and_then(|el| el.text_value())
                    .and_then(|raw| Decimal::from_str(raw).ok());
                let card_number = request
                    .at(&["Block1", "CardData", "ManualEntry", "CardNbr"])
                    .or_else(|| request.at(&["Block1", "CardData", "CardNbr"]))
                    .and_then(|el| el.text_value())
                    .map(str::to_string);
                self.transactions.write().await.insert(
                    id,
                    SimulatedTransaction {
                        kind,
                        amount,
                        card_number,
                        original_id,
                    },
                );
                approval(request, kind, id, amount)
            }
        };
        response_document(id, "0", "Success", client_txn_id, Some(body))
    }

    async fn detail_report(&self, transaction_id: i64) -> Element {
        let transactions = self.transactions.read().await;
        let mut body = Element::new(TransactionKind::ReportTxnDetail.tag());
        Element::sub_text(&mut body, "GatewayTxnId", transaction_id.to_string());
        if let Some(txn) = transactions.get(&transaction_id) {
            Element::sub_text_opt(&mut body, "OriginalGatewayTxnId", txn.original_id);
            Element::sub_text(&mut body, "ServiceName", txn.kind.tag());
            let data = Element::sub_element(&mut body, "Data");
            Element::sub_text_opt(data, "Amt", txn.amount);
            Element::sub_text_opt(data, "MaskedCardNbr", txn.card_number.as_deref().map(mask));
            Element::sub_text(data, "RspCode", "00");
            Element::sub_text(data, "RspText", "APPROVAL");
        }
        body
    }

    async fn activity_report(&self) -> Element {
        let transactions = self.transactions.read().await;
        let mut body = Element::new(TransactionKind::ReportActivity.tag());
        for (id, txn) in transactions.iter() {
            let details = Element::sub_element(&mut body, "Details");
            Element::sub_text(details, "GatewayTxnId", id.to_string());
            Element::sub_text_opt(details, "OriginalGatewayTxnId", txn.original_id);
            Element::sub_text(details, "ServiceName", txn.kind.tag());
            Element::sub_text_opt(details, "MaskedCardNbr", txn.card_number.as_deref().map(mask));
            Element::sub_text(details, "IssuerRspCode", "00");
            Element::sub_text(details, "IssuerRspText", "APPROVAL");
            Element::sub_text_opt(details, "Amt", txn.amount);
            Element::sub_text(details, "GatewayRspCode", "0");
            Element::sub_text(details, "GatewayRspMsg", "Success");
        }
        body
    }
}

fn parse_int(el: &Element) -> Option<i64> {
    el.text_value().and_then(|raw| raw.trim().parse().ok())
}

fn mask(number: &str) -> String {
    let visible = number.len().saturating_sub(4);
    format!("{}{}", "*".repeat(visible), &number[visible..])
}

fn approval(request: &Element, kind: TransactionKind, id: i64, amount: Option<Decimal>) -> Element {
    let mut body = Element::new(kind.tag());
    match kind {
        TransactionKind::CreditSale
        | TransactionKind::CreditAuth
        | TransactionKind::CreditAccountVerify => {
            Element::sub_text(&mut body, "RspCode", "00");
            Element::sub_text(&mut body, "RspText", "APPROVAL");
            Element::sub_text(&mut body, "AuthCode", format!("{:06}", id % 1_000_000));
            Element::sub_text(&mut body, "AVSRsltCode", "0");
            Element::sub_text(&mut body, "CVVRsltCode", "M");
            Element::sub_text_opt(&mut body, "AuthAmt", amount);
        }
        TransactionKind::GiftCardActivate => {
            Element::sub_text(&mut body, "RspCode", "0");
            Element::sub_text(&mut body, "RspText", "Success");
            Element::sub_text(&mut body, "AuthCode", format!("{:06}", id % 1_000_000));
            Element::sub_text_opt(&mut body, "BalanceAmt", amount);
        }
        TransactionKind::CreditReturn | TransactionKind::CreditReversal => {
            Element::sub_text(&mut body, "RspCode", "00");
            Element::sub_text(&mut body, "RspText", "APPROVAL");
        }
        _ => {}
    }

    let token_requested = request
        .at(&["Block1", "CardData", "TokenRequest"])
        .and_then(Element::text_value)
        == Some("Y");
    if !token_requested {
        return body;
    }

    let mut wrapper = Element::new("Response");
    wrapper.append(body);
    let token = Element::sub_element(&mut wrapper, "TokenData");
    Element::sub_text(token, "TokenRspCode", "0");
    Element::sub_text(token, "TokenRspMsg", "Success");
    Element::sub_text(token, "TokenValue", format!("supt_{id}"));
    wrapper
}

#[async_trait]
impl Transport for SimulatedGateway {
    async fn submit(
        &self,
        request: &Element,
        client_txn_id: Option<&str>,
    ) -> Result<ElementTree, TransportError> {
        Ok(self.handle(request, client_txn_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn void(id: i64) -> Element {
        let mut request = Element::new("CreditVoid");
        Element::sub_text(&mut request, "GatewayTxnId", id.to_string());
        request
    }

    #[tokio::test]
    async fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .push_response(response_document(1, "0", "Success", None, None))
            .await;
        transport.push_error(TransportError::Timeout).await;

        assert!(transport.submit(&void(1), Some("c-1")).await.is_ok());
        assert_eq!(
            transport.submit(&void(1), None).await,
            Err(TransportError::Timeout)
        );
        assert!(transport.submit(&void(1), None).await.is_err());

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].client_txn_id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn test_simulated_gateway_rejects_unknown_original() {
        let gateway = SimulatedGateway::new();
        let tree = gateway.submit(&void(42), None).await.unwrap();
        let header = tree.get("Header").unwrap();
        assert_eq!(header.get_string("GatewayRspCode").unwrap(), "3");
        assert_eq!(gateway.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_simulated_gateway_remembers_sales() {
        let gateway = SimulatedGateway::new();
        let mut sale = Element::new("CreditSale");
        let block1 = Element::sub_element(&mut sale, "Block1");
        Element::sub_text(block1, "Amt", "10.00");
        let card_data = Element::sub_element(block1, "CardData");
        Element::sub_text(card_data, "TokenRequest", "Y");

        let tree = gateway.submit(&sale, None).await.unwrap();
        let id = tree.get("Header").unwrap().get_int("GatewayTxnId").unwrap();
        assert_eq!(
            tree.get("TokenData").unwrap().get_string("TokenValue").unwrap(),
            format!("supt_{id}")
        );
        assert_eq!(
            tree.get("CreditSale").unwrap().get_string("RspCode").unwrap(),
            "00"
        );

        let tree = gateway.submit(&void(id), None).await.unwrap();
        assert_eq!(
            tree.get("Header").unwrap().get_string("GatewayRspCode").unwrap(),
            "0"
        );
        assert_eq!(gateway.transaction_count().await, 2);
    }

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("4012002000060016"), "************0016");
        assert_eq!(mask("12"), "12");
    }
}
