use crate::domain::element::ElementError;
use crate::infrastructure::codes::{GatewayErrorKind, IssuerErrorKind};
use crate::infrastructure::xml::XmlError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Failures raised by the transport collaborator.
///
/// These live on a different layer than the gateway's own timeout code: a
/// `Timeout` here means no response arrived at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    InvalidRequestError(String),
    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),
    #[error("Response error: {0}")]
    ResponseError(#[from] ElementError),
    #[error("XML error: {0}")]
    XmlError(#[from] XmlError),
    #[error("{message}")]
    GatewayError {
        kind: GatewayErrorKind,
        code: String,
        message: String,
        transaction_id: Option<i64>,
    },
    #[error("{}", timeout_reversal_message(.reversed))]
    GatewayTimeoutReversalError {
        transaction_id: i64,
        reversed: bool,
        #[source]
        source: Box<PaymentError>,
    },
    #[error("{message}")]
    IssuerDeclineError {
        kind: IssuerErrorKind,
        code: String,
        text: String,
        message: String,
        transaction_id: i64,
    },
    #[error("Error occurred while reversing a charge due to an issuer timeout.")]
    IssuerTimeoutReversalError {
        transaction_id: i64,
        #[source]
        source: Box<PaymentError>,
    },
}

fn timeout_reversal_message(reversed: &bool) -> &'static str {
    if *reversed {
        "Gateway timed out; the charge was reversed."
    } else {
        "Error occurred while reversing a charge due to a gateway timeout."
    }
}

impl PaymentError {
    /// Numeric gateway response code embedded in a gateway error, if any.
    pub fn gateway_response_code(&self) -> Option<i32> {
        match self {
            PaymentError::GatewayError { code, .. } => code.trim().parse().ok(),
            _ => None,
        }
    }

    /// Gateway-assigned id of the transaction the error refers to.
    pub fn transaction_id(&self) -> Option<i64> {
        match self {
            PaymentError::GatewayError { transaction_id, .. } => *transaction_id,
            PaymentError::GatewayTimeoutReversalError { transaction_id, .. }
            | PaymentError::IssuerDeclineError { transaction_id, .. }
            | PaymentError::IssuerTimeoutReversalError { transaction_id, .. } => {
                Some(*transaction_id)
            }
            _ => None,
        }
    }
}
