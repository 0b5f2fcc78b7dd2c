use serde::{Deserialize, Serialize};
use std::fmt;

/// Root tag of a gateway request; the response echoes it as the sibling of
/// `Header`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    CreditSale,
    CreditAuth,
    CreditAddToBatch,
    CreditReturn,
    CreditReversal,
    CreditTxnEdit,
    CreditVoid,
    CreditCpcEdit,
    CreditAccountVerify,
    GiftCardActivate,
    ReportTxnDetail,
    ReportActivity,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 12] = [
        TransactionKind::CreditSale,
        TransactionKind::CreditAuth,
        TransactionKind::CreditAddToBatch,
        TransactionKind::CreditReturn,
        TransactionKind::CreditReversal,
        TransactionKind::CreditTxnEdit,
        TransactionKind::CreditVoid,
        TransactionKind::CreditCpcEdit,
        TransactionKind::CreditAccountVerify,
        TransactionKind::GiftCardActivate,
        TransactionKind::ReportTxnDetail,
        TransactionKind::ReportActivity,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            TransactionKind::CreditSale => "CreditSale",
            TransactionKind::CreditAuth => "CreditAuth",
            TransactionKind::CreditAddToBatch => "CreditAddToBatch",
            TransactionKind::CreditReturn => "CreditReturn",
            TransactionKind::CreditReversal => "CreditReversal",
            TransactionKind::CreditTxnEdit => "CreditTxnEdit",
            TransactionKind::CreditVoid => "CreditVoid",
            TransactionKind::CreditCpcEdit => "CreditCPCEdit",
            TransactionKind::CreditAccountVerify => "CreditAccountVerify",
            TransactionKind::GiftCardActivate => "GiftCardActivate",
            TransactionKind::ReportTxnDetail => "ReportTxnDetail",
            TransactionKind::ReportActivity => "ReportActivity",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Kinds whose amount is at stake if a timeout leaves the outcome
    /// unknown. Only these can be compensated by a reversal.
    pub fn is_compensable(&self) -> bool {
        matches!(self, TransactionKind::CreditSale | TransactionKind::CreditAuth)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Caller-facing transaction category, used to filter activity reports.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Authorize,
    Capture,
    Charge,
    Refund,
    Reverse,
    Verify,
    Void,
    Edit,
    CpcEdit,
    GiftActivate,
}

impl TransactionType {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionType::Authorize => TransactionKind::CreditAuth,
            TransactionType::Capture => TransactionKind::CreditAddToBatch,
            TransactionType::Charge => TransactionKind::CreditSale,
            TransactionType::Refund => TransactionKind::CreditReturn,
            TransactionType::Reverse => TransactionKind::CreditReversal,
            TransactionType::Verify => TransactionKind::CreditAccountVerify,
            TransactionType::Void => TransactionKind::CreditVoid,
            TransactionType::Edit => TransactionKind::CreditTxnEdit,
            TransactionType::CpcEdit => TransactionKind::CreditCpcEdit,
            TransactionType::GiftActivate => TransactionKind::GiftCardActivate,
        }
    }

    /// Lowercase name, as used in batch files.
    pub fn name(&self) -> &'static str {
        match self {
            TransactionType::Authorize => "authorize",
            TransactionType::Capture => "capture",
            TransactionType::Charge => "charge",
            TransactionType::Refund => "refund",
            TransactionType::Reverse => "reverse",
            TransactionType::Verify => "verify",
            TransactionType::Void => "void",
            TransactionType::Edit => "edit",
            TransactionType::CpcEdit => "cpcedit",
            TransactionType::GiftActivate => "giftactivate",
        }
    }

    /// Maps a report's `ServiceName` back to a transaction type.
    pub fn from_service_name(name: &str) -> Option<Self> {
        use TransactionType::*;
        [
            Authorize, Capture, Charge, Refund, Reverse, Verify, Void, Edit, CpcEdit,
            GiftActivate,
        ]
        .into_iter()
        .find(|t| t.kind().tag() == name)
    }
}
