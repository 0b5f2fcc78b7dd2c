//! Typed results hydrated from a classified response tree.
//!
//! These are only built after the classifier has accepted the response, so a
//! caller never sees a partially populated result.

use super::element::{Element, ElementError, ElementTree};
use super::transaction::{TransactionKind, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;

/// Fields every transaction result carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: i64,
    pub client_transaction_id: Option<String>,
    pub gateway_response_code: String,
    pub gateway_response_message: Option<String>,
    pub response_code: String,
    pub response_text: String,
    pub reference_number: Option<String>,
}

impl TransactionResponse {
    pub fn from_tree(tree: &ElementTree, kind: TransactionKind) -> Result<Self, ElementError> {
        let header = tree.require("Header")?;
        let mut response = Self {
            transaction_id: header.get_int("GatewayTxnId")?,
            client_transaction_id: header.get_string_opt("ClientTxnId")?,
            gateway_response_code: header.get_string("GatewayRspCode")?,
            gateway_response_message: header.get_string_opt("GatewayRspMsg")?,
            response_code: String::new(),
            response_text: String::new(),
            reference_number: None,
        };
        if let Some(body) = tree.get(kind.tag()) {
            response.response_code = body.get_string_opt("RspCode")?.unwrap_or_default();
            response.response_text = body.get_string_opt("RspText")?.unwrap_or_default();
            response.reference_number = body.get_string_opt("RefNbr")?;
        }
        Ok(response)
    }

    /// Identifier-based operations only report success or an error, so their
    /// code/text are pinned to the approval values.
    pub fn normalized(mut self) -> Self {
        self.response_code = "00".to_string();
        self.response_text = String::new();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenData {
    pub token_value: Option<String>,
    pub response_code: Option<String>,
    pub response_message: Option<String>,
}

impl TokenData {
    fn from_element(el: &Element) -> Result<Self, ElementError> {
        Ok(Self {
            token_value: el.get_string_opt("TokenValue")?,
            response_code: el.get_string_opt("TokenRspCode")?,
            response_message: el.get_string_opt("TokenRspMsg")?,
        })
    }
}

/// Result of a sale, authorization or account verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Authorization {
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    pub authorization_code: Option<String>,
    pub avs_result_code: Option<String>,
    pub avs_result_text: Option<String>,
    pub cvv_result_code: Option<String>,
    pub cvv_result_text: Option<String>,
    pub card_type: Option<String>,
    pub cpc_indicator: Option<String>,
    pub authorized_amount: Option<Decimal>,
    pub token_data: Option<TokenData>,
}

pub type Charge = Authorization;
pub type AccountVerify = Authorization;

impl Authorization {
    pub fn from_tree(tree: &ElementTree, kind: TransactionKind) -> Result<Self, ElementError> {
        let transaction = TransactionResponse::from_tree(tree, kind)?;
        let mut auth = Self {
            transaction,
            authorization_code: None,
            avs_result_code: None,
            avs_result_text: None,
            cvv_result_code: None,
            cvv_result_text: None,
            card_type: None,
            cpc_indicator: None,
            authorized_amount: None,
            token_data: None,
        };
        if let Some(body) = tree.get(kind.tag()) {
            auth.authorization_code = body.get_string_opt("AuthCode")?;
            auth.avs_result_code = body.get_string_opt("AVSRsltCode")?;
            auth.avs_result_text = body.get_string_opt("AVSRsltText")?;
            auth.cvv_result_code = body.get_string_opt("CVVRsltCode")?;
            auth.cvv_result_text = body.get_string_opt("CVVRsltText")?;
            auth.card_type = body.get_string_opt("CardType")?;
            auth.cpc_indicator = body.get_string_opt("CPCInd")?;
            auth.authorized_amount = body.get_decimal_opt("AuthAmt")?;
        }
        if let Some(token) = tree.get("TokenData") {
            auth.token_data = Some(TokenData::from_element(token)?);
        }
        Ok(auth)
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction.transaction_id
    }

    pub fn response_code(&self) -> &str {
        &self.transaction.response_code
    }
}

pub type Refund = TransactionResponse;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reversal {
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    pub avs_result_code: Option<String>,
    pub cvv_result_code: Option<String>,
    pub cpc_indicator: Option<String>,
}

impl Reversal {
    pub fn from_tree(tree: &ElementTree) -> Result<Self, ElementError> {
        let kind = TransactionKind::CreditReversal;
        let transaction = TransactionResponse::from_tree(tree, kind)?;
        let body = tree.get(kind.tag());
        Ok(Self {
            transaction,
            avs_result_code: opt_field(body, "AVSRsltCode")?,
            cvv_result_code: opt_field(body, "CVVRsltCode")?,
            cpc_indicator: opt_field(body, "CPCInd")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiftCardResponse {
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    pub authorization_code: Option<String>,
    pub balance_amount: Option<Decimal>,
    pub points_balance_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl GiftCardResponse {
    pub fn from_tree(tree: &ElementTree) -> Result<Self, ElementError> {
        let kind = TransactionKind::GiftCardActivate;
        let transaction = TransactionResponse::from_tree(tree, kind)?;
        let body = tree.get(kind.tag());
        Ok(Self {
            transaction,
            authorization_code: opt_field(body, "AuthCode")?,
            balance_amount: match body {
                Some(b) => b.get_decimal_opt("BalanceAmt")?,
                None => None,
            },
            points_balance_amount: match body {
                Some(b) => b.get_decimal_opt("PointsBalanceAmt")?,
                None => None,
            },
            notes: opt_field(body, "Notes")?,
        })
    }
}

/// Detail report of a single transaction (`ReportTxnDetail`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTransactionDetails {
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    pub original_transaction_id: Option<i64>,
    pub transaction_type: Option<TransactionType>,
    pub masked_card_number: Option<String>,
    pub amount: Option<Decimal>,
    pub authorized_amount: Option<Decimal>,
    pub settlement_amount: Option<Decimal>,
    pub authorization_code: Option<String>,
    pub card_type: Option<String>,
    pub issuer_response_code: Option<String>,
    pub issuer_response_text: Option<String>,
    pub memo: Option<String>,
    pub invoice_number: Option<String>,
    pub customer_id: Option<String>,
}

impl ReportTransactionDetails {
    pub fn from_tree(tree: &ElementTree) -> Result<Self, ElementError> {
        let kind = TransactionKind::ReportTxnDetail;
        let transaction = TransactionResponse::from_tree(tree, kind)?;
        let body = tree.require(kind.tag())?;
        let data = body.child("Data");
        let fields = data.and_then(|d| d.child("AdditionalTxnFields"));

        Ok(Self {
            transaction,
            original_transaction_id: body.get_int_opt("OriginalGatewayTxnId")?,
            transaction_type: body
                .get_string_opt("ServiceName")?
                .and_then(|name| TransactionType::from_service_name(&name)),
            masked_card_number: opt_field(data, "MaskedCardNbr")?,
            amount: opt_decimal(data, "Amt")?,
            authorized_amount: opt_decimal(data, "AuthAmt")?,
            settlement_amount: opt_decimal(data, "SettlementAmt")?,
            authorization_code: opt_field(data, "AuthCode")?,
            card_type: opt_field(data, "CardType")?,
            issuer_response_code: opt_field(data, "RspCode")?,
            issuer_response_text: opt_field(data, "RspText")?,
            memo: opt_field(fields, "Description")?,
            invoice_number: opt_field(fields, "InvoiceNbr")?,
            customer_id: opt_field(fields, "CustomerID")?,
        })
    }
}

/// One row of an activity report (`ReportActivity/Details`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTransactionSummary {
    pub transaction_id: i64,
    pub original_transaction_id: Option<i64>,
    pub transaction_type: Option<TransactionType>,
    pub masked_card_number: Option<String>,
    pub response_code: Option<String>,
    pub response_text: Option<String>,
    pub amount: Option<Decimal>,
    pub settlement_amount: Option<Decimal>,
    pub transaction_utc_date: Option<String>,
    pub gateway_response_code: Option<String>,
    pub gateway_response_message: Option<String>,
}

impl ReportTransactionSummary {
    /// Reads every `Details` row, keeping only `filter` matches when given.
    pub fn list_from_tree(
        tree: &ElementTree,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Self>, ElementError> {
        let body = tree.require(TransactionKind::ReportActivity.tag())?;
        let mut summaries = Vec::new();
        for details in body.children_named("Details") {
            let summary = Self::from_element(details)?;
            if filter.is_none() || summary.transaction_type == filter {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    fn from_element(el: &Element) -> Result<Self, ElementError> {
        Ok(Self {
            transaction_id: el.get_int("GatewayTxnId")?,
            original_transaction_id: el.get_int_opt("OriginalGatewayTxnId")?,
            transaction_type: el
                .get_string_opt("ServiceName")?
                .and_then(|name| TransactionType::from_service_name(&name)),
            masked_card_number: el.get_string_opt("MaskedCardNbr")?,
            response_code: el.get_string_opt("IssuerRspCode")?,
            response_text: el.get_string_opt("IssuerRspText")?,
            amount: el.get_decimal_opt("Amt")?,
            settlement_amount: el.get_decimal_opt("SettlementAmt")?,
            transaction_utc_date: el.get_string_opt("TxnUtcDT")?,
            gateway_response_code: el.get_string_opt("GatewayRspCode")?,
            gateway_response_message: el.get_string_opt("GatewayRspMsg")?,
        })
    }
}

fn opt_field(el: Option<&Element>, tag: &str) -> Result<Option<String>, ElementError> {
    match el {
        Some(el) => el.get_string_opt(tag),
        None => Ok(None),
    }
}

fn opt_decimal(el: Option<&Element>, tag: &str) -> Result<Option<Decimal>, ElementError> {
    match el {
        Some(el) => el.get_decimal_opt(tag),
        None => Ok(None),
    }
}
