//! Gateway and issuer response-code tables.

use serde::Serialize;

/// How a response code should be treated by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Approved,
    Timeout,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GatewayErrorKind {
    AuthenticationError,
    UnknownGatewayError,
    InvalidOriginalTransaction,
    NoOpenBatch,
    InvalidCpcData,
    InvalidCardData,
    InvalidNumber,
    GatewayTimeout,
    UnexpectedGatewayResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssuerErrorKind {
    CardDeclined,
    ProcessingError,
    InvalidAmount,
    IncorrectNumber,
    ExpiredCard,
    InvalidPin,
    PinRetriesExceeded,
    InvalidExpiry,
    PinVerification,
    IssuerTimeout,
    IncorrectCvc,
    PossibleFraudDetected,
    UnknownIssuerError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry<K> {
    pub kind: Option<K>,
    pub message: &'static str,
    pub severity: Severity,
}

impl<K> CodeEntry<K> {
    const fn approved() -> Self {
        Self {
            kind: None,
            message: "",
            severity: Severity::Approved,
        }
    }

    const fn error(kind: K, message: &'static str, severity: Severity) -> Self {
        Self {
            kind: Some(kind),
            message,
            severity,
        }
    }
}

pub const GATEWAY_TIMEOUT_CODE: &str = "30";
pub const ISSUER_TIMEOUT_CODE: &str = "91";

/// Looks up a `Header.GatewayRspCode`. Unlisted codes map to
/// `UnknownGatewayError`.
pub fn gateway_code(code: &str) -> CodeEntry<GatewayErrorKind> {
    use GatewayErrorKind::*;
    use Severity::*;
    match code.trim() {
        "0" | "00" => CodeEntry::approved(),
        "-2" => CodeEntry::error(
            AuthenticationError,
            "Authentication error. Please double check your service configuration.",
            Terminal,
        ),
        "3" => CodeEntry::error(InvalidOriginalTransaction, "Invalid original transaction.", Terminal),
        "5" => CodeEntry::error(NoOpenBatch, "Current batch is not open.", Terminal),
        "12" => CodeEntry::error(InvalidCpcData, "Invalid CPC data.", Terminal),
        "13" => CodeEntry::error(InvalidCardData, "Invalid card data.", Terminal),
        "14" => CodeEntry::error(InvalidNumber, "The card number is not valid.", Terminal),
        GATEWAY_TIMEOUT_CODE => CodeEntry::error(GatewayTimeout, "Gateway timed out.", Timeout),
        _ => CodeEntry::error(
            UnknownGatewayError,
            "An unknown gateway error has occurred.",
            Terminal,
        ),
    }
}

/// Looks up an issuer `RspCode`.
pub fn issuer_code(code: &str) -> CodeEntry<IssuerErrorKind> {
    use IssuerErrorKind::*;
    use Severity::*;
    match code.trim() {
        "" | "0" | "00" | "10" | "85" => CodeEntry::approved(),
        "02" | "03" | "04" | "05" | "41" | "43" | "44" | "51" | "56" | "61" | "62" | "63"
        | "65" | "78" => CodeEntry::error(CardDeclined, "The card was declined.", Terminal),
        "06" | "07" | "12" | "15" | "19" | "52" | "53" | "57" | "58" | "76" | "77" | "96"
        | "EC" => CodeEntry::error(
            ProcessingError,
            "An error occurred while processing the card.",
            Terminal,
        ),
        "13" => CodeEntry::error(InvalidAmount, "Must be greater than or equal 0.", Terminal),
        "14" | "89" => CodeEntry::error(IncorrectNumber, "The card number is incorrect.", Terminal),
        "54" => CodeEntry::error(ExpiredCard, "The card has expired.", Terminal),
        "55" => CodeEntry::error(InvalidPin, "The pin is invalid.", Terminal),
        "75" => CodeEntry::error(
            PinRetriesExceeded,
            "Maximum number of pin retries exceeded.",
            Terminal,
        ),
        "80" => CodeEntry::error(InvalidExpiry, "Card expiration date is invalid.", Terminal),
        "86" => CodeEntry::error(PinVerification, "Can't verify card pin number.", Terminal),
        ISSUER_TIMEOUT_CODE => CodeEntry::error(IssuerTimeout, "The card issuer timed-out.", Timeout),
        "EB" | "N7" => CodeEntry::error(
            IncorrectCvc,
            "The card's security code is incorrect.",
            Terminal,
        ),
        "FR" => CodeEntry::error(PossibleFraudDetected, "Possible fraud detected.", Terminal),
        _ => CodeEntry::error(
            UnknownIssuerError,
            "An unknown issuer error has occurred.",
            Terminal,
        ),
    }
}
