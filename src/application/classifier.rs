//! Two-layer response classification and the compensating-reversal saga.
//!
//! A response moves through at most two states: `classify` either settles it
//! or asks for one compensating reversal, and `resolve` settles a compensation
//! once the reversal result is known. The gateway check always precedes the
//! issuer check.

use crate::domain::element::{Element, ElementTree};
use crate::domain::outcome::GatewayOutcome;
use crate::domain::transaction::TransactionKind;
use crate::error::{PaymentError, Result};
use crate::infrastructure::codes::{GatewayErrorKind, Severity, gateway_code, issuer_code};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Gateway code a failed reversal carries when the original was never
/// recorded, meaning the issuer timeout left nothing to undo.
pub const INVALID_ORIGINAL_CODE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutOrigin {
    Gateway,
    Issuer,
}

/// A timeout that leaves the transaction's fate unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeout {
    pub origin: TimeoutOrigin,
    pub transaction_id: i64,
    pub code: String,
    pub text: String,
}

impl Timeout {
    /// Outcome reported when no reversal is attempted.
    pub fn uncompensated(self) -> GatewayOutcome {
        match self.origin {
            TimeoutOrigin::Gateway => GatewayOutcome::GatewayError { code: self.code },
            TimeoutOrigin::Issuer => GatewayOutcome::IssuerDeclined {
                code: self.code,
                text: self.text,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Settled(GatewayOutcome),
    Compensate(Timeout),
}

/// Header and same-tag fields the classifier reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub transaction_id: Option<i64>,
    pub disposition: Disposition,
}

pub fn classify(response: &ElementTree, kind: TransactionKind) -> Result<Classified> {
    let header = response.require("Header")?;
    let transaction_id = header.get_int_opt("GatewayTxnId")?;
    let code = header.get_string("GatewayRspCode")?;

    let gateway = gateway_code(&code);
    match gateway.severity {
        Severity::Approved => {}
        Severity::Timeout => {
            return Ok(Classified {
                transaction_id,
                disposition: Disposition::Compensate(Timeout {
                    origin: TimeoutOrigin::Gateway,
                    transaction_id: header.get_int("GatewayTxnId")?,
                    text: header.get_string_opt("GatewayRspMsg")?.unwrap_or_default(),
                    code,
                }),
            });
        }
        Severity::Terminal => {
            return Ok(Classified {
                transaction_id,
                disposition: Disposition::Settled(GatewayOutcome::GatewayError { code }),
            });
        }
    }

    let Some(body) = response.get(kind.tag()) else {
        if code.trim() == "00" {
            return Ok(Classified {
                transaction_id,
                disposition: Disposition::Settled(GatewayOutcome::Success),
            });
        }
        return Err(PaymentError::GatewayError {
            kind: GatewayErrorKind::UnexpectedGatewayResponse,
            code,
            message: format!("Unexpected gateway response: missing {kind}."),
            transaction_id,
        });
    };

    let code = body.get_string_opt("RspCode")?.unwrap_or_default();
    let text = body.get_string_opt("RspText")?.unwrap_or_default();
    let disposition = match issuer_code(&code).severity {
        Severity::Approved => Disposition::Settled(GatewayOutcome::Success),
        Severity::Timeout => Disposition::Compensate(Timeout {
            origin: TimeoutOrigin::Issuer,
            transaction_id: header.get_int("GatewayTxnId")?,
            code,
            text,
        }),
        Severity::Terminal => Disposition::Settled(GatewayOutcome::IssuerDeclined { code, text }),
    };
    Ok(Classified {
        transaction_id,
        disposition,
    })
}

/// Settles a compensated timeout given the result of its reversal.
pub fn resolve(timeout: Timeout, reversal: Result<()>) -> Result<GatewayOutcome> {
    match (timeout.origin, reversal) {
        (TimeoutOrigin::Gateway, Ok(())) => Ok(GatewayOutcome::GatewayTimeoutReversed),
        (TimeoutOrigin::Gateway, Err(cause)) => Err(PaymentError::GatewayTimeoutReversalError {
            transaction_id: timeout.transaction_id,
            reversed: false,
            source: Box::new(cause),
        }),
        (TimeoutOrigin::Issuer, Ok(())) => Ok(GatewayOutcome::IssuerTimeoutReversed {
            code: timeout.code,
            text: timeout.text,
        }),
        (TimeoutOrigin::Issuer, Err(cause))
            if cause.gateway_response_code() == Some(INVALID_ORIGINAL_CODE) =>
        {
            Ok(GatewayOutcome::IssuerDeclined {
                code: timeout.code,
                text: timeout.text,
            })
        }
        (TimeoutOrigin::Issuer, Err(cause)) => Err(PaymentError::IssuerTimeoutReversalError {
            transaction_id: timeout.transaction_id,
            source: Box::new(cause),
        }),
    }
}

/// Amount at stake for a compensating reversal. Only sales and
/// authorizations carry one.
pub fn compensable_amount(request: &Element, kind: TransactionKind) -> Option<Decimal> {
    if !kind.is_compensable() {
        return None;
    }
    request
        .at(&["Block1", "Amt"])
        .and_then(Element::text_value)
        .and_then(|raw| Decimal::from_str(raw).ok())
}
