use crate::error::{PaymentError, Result};
use crate::infrastructure::codes::{
    GATEWAY_TIMEOUT_CODE, GatewayErrorKind, IssuerErrorKind, gateway_code, issuer_code,
};

/// Classification of one submitted transaction.
///
/// Produced once per submission and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Success,
    /// Gateway code 30; the compensating reversal went through.
    GatewayTimeoutReversed,
    GatewayError { code: String },
    IssuerDeclined { code: String, text: String },
    /// Issuer code 91; the compensating reversal went through.
    IssuerTimeoutReversed { code: String, text: String },
}

impl GatewayOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GatewayOutcome::Success)
    }

    /// Maps the outcome onto the caller-facing error taxonomy.
    pub fn into_result(self, transaction_id: Option<i64>) -> Result<()> {
        match self {
            GatewayOutcome::Success => Ok(()),
            GatewayOutcome::GatewayError { code } => Err(gateway_error(code, transaction_id)),
            GatewayOutcome::GatewayTimeoutReversed => {
                Err(PaymentError::GatewayTimeoutReversalError {
                    transaction_id: transaction_id.unwrap_or_default(),
                    reversed: true,
                    source: Box::new(gateway_error(
                        GATEWAY_TIMEOUT_CODE.to_string(),
                        transaction_id,
                    )),
                })
            }
            GatewayOutcome::IssuerDeclined { code, text }
            | GatewayOutcome::IssuerTimeoutReversed { code, text } => {
                let entry = issuer_code(&code);
                Err(PaymentError::IssuerDeclineError {
                    kind: entry.kind.unwrap_or(IssuerErrorKind::UnknownIssuerError),
                    message: entry.message.to_string(),
                    code,
                    text,
                    transaction_id: transaction_id.unwrap_or_default(),
                })
            }
        }
    }
}

fn gateway_error(code: String, transaction_id: Option<i64>) -> PaymentError {
    let entry = gateway_code(&code);
    PaymentError::GatewayError {
        kind: entry.kind.unwrap_or(GatewayErrorKind::UnknownGatewayError),
        message: entry.message.to_string(),
        code,
        transaction_id,
    }
}
