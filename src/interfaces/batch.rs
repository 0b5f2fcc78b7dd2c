//! Runs batch rows through the credit service.

use super::csv::request_reader::RequestRow;
use super::csv::result_writer::{ResultRow, RowStatus};
use crate::application::builders::{
    AuthorizationBuilder, CaptureBuilder, CpcEditBuilder, EditBuilder, GiftCardActivateBuilder,
    RefundBuilder, ReverseBuilder, VerifyBuilder, VoidBuilder,
};
use crate::application::service::CreditService;
use crate::domain::card::{CreditCard, GiftCard};
use crate::domain::element::Element;
use crate::domain::market::CpcData;
use crate::domain::transaction::TransactionType;
use crate::error::{PaymentError, Result};
use tracing::debug;

/// A configured builder for one row.
pub enum PreparedRequest<'a> {
    Authorization(AuthorizationBuilder<'a>),
    Verify(VerifyBuilder<'a>),
    Capture(CaptureBuilder<'a>),
    Refund(RefundBuilder<'a>),
    Reverse(ReverseBuilder<'a>),
    Edit(EditBuilder<'a>),
    Void(VoidBuilder<'a>),
    CpcEdit(CpcEditBuilder<'a>),
    GiftActivate(GiftCardActivateBuilder<'a>),
}

/// The fields a batch result reports for a successful row.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub transaction_id: i64,
    pub response_code: String,
    pub response_text: String,
}

impl PreparedRequest<'_> {
    pub fn build(&self) -> Result<Element> {
        match self {
            PreparedRequest::Authorization(b) => b.build(),
            PreparedRequest::Verify(b) => b.build(),
            PreparedRequest::Capture(b) => b.build(),
            PreparedRequest::Refund(b) => b.build(),
            PreparedRequest::Reverse(b) => b.build(),
            PreparedRequest::Edit(b) => b.build(),
            PreparedRequest::Void(b) => b.build(),
            PreparedRequest::CpcEdit(b) => b.build(),
            PreparedRequest::GiftActivate(b) => b.build(),
        }
    }

    pub async fn execute(self) -> Result<Executed> {
        let transaction = match self {
            PreparedRequest::Authorization(b) => b.execute().await?.transaction,
            PreparedRequest::Verify(b) => b.execute().await?.transaction,
            PreparedRequest::Capture(b) => b.execute().await?,
            PreparedRequest::Refund(b) => b.execute().await?,
            PreparedRequest::Reverse(b) => b.execute().await?.transaction,
            PreparedRequest::Edit(b) => b.execute().await?,
            PreparedRequest::Void(b) => b.execute().await?,
            PreparedRequest::CpcEdit(b) => b.execute().await?,
            PreparedRequest::GiftActivate(b) => b.execute().await?.transaction,
        };
        Ok(Executed {
            transaction_id: transaction.transaction_id,
            response_code: transaction.response_code,
            response_text: transaction.response_text,
        })
    }
}

fn card(row: &RequestRow) -> Option<CreditCard> {
    let number = row.card_number.as_deref()?;
    let card = CreditCard::new(
        number,
        row.exp_month.unwrap_or_default(),
        row.exp_year.unwrap_or_default(),
    );
    Some(match &row.cvv {
        Some(cvv) => card.with_cvv(cvv.as_str()),
        None => card,
    })
}

/// Commercial-card columns, or `None` when the row leaves them all empty.
fn cpc_data(row: &RequestRow) -> Result<Option<CpcData>> {
    if row.po_number.is_none() && row.tax_type.is_none() && row.tax_amount.is_none() {
        return Ok(None);
    }
    let mut data = CpcData::new();
    if let Some(po_number) = &row.po_number {
        data = data.with_po_number(po_number.as_str())?;
    }
    if let Some(tax_type) = row.tax_type {
        data = data.with_tax_type(tax_type);
    }
    if let Some(tax_amount) = row.tax_amount {
        data = data.with_tax_amount(tax_amount)?;
    }
    Ok(Some(data))
}

/// Maps a row onto the builder for its operation. Missing inputs are left
/// unset so the builder's own rules report them.
pub fn prepare<'a>(service: &'a CreditService, row: &RequestRow) -> Result<PreparedRequest<'a>> {
    let transaction_id = row.transaction_id.unwrap_or_default();
    let request = match row.op {
        TransactionType::Charge | TransactionType::Authorize => {
            let mut builder = if row.op == TransactionType::Charge {
                service.charge(row.amount)
            } else {
                service.authorize(row.amount)
            };
            builder = builder.with_allow_duplicates(row.allow_duplicates.unwrap_or_default());
            if let Some(currency) = &row.currency {
                builder = builder.with_currency(currency.as_str());
            }
            if let Some(card) = card(row) {
                builder = builder.with_card(card);
            } else if let Some(token) = &row.token {
                builder = builder.with_token(token.as_str());
            }
            PreparedRequest::Authorization(builder)
        }
        TransactionType::Verify => {
            let mut builder = service.verify();
            if let Some(card) = card(row) {
                builder = builder.with_card(card);
            } else if let Some(token) = &row.token {
                builder = builder.with_token(token.as_str());
            }
            PreparedRequest::Verify(builder)
        }
        TransactionType::Capture => {
            let mut builder = service.capture(transaction_id);
            if let Some(amount) = row.amount {
                builder = builder.with_amount(amount);
            }
            PreparedRequest::Capture(builder)
        }
        TransactionType::Refund => {
            let mut builder = service.refund(row.amount);
            if let Some(currency) = &row.currency {
                builder = builder.with_currency(currency.as_str());
            }
            if let Some(id) = row.transaction_id {
                builder = builder.with_transaction_id(id);
            } else if let Some(card) = card(row) {
                builder = builder.with_card(card);
            }
            PreparedRequest::Refund(builder)
        }
        TransactionType::Reverse => {
            let mut builder = service.reverse(row.amount);
            if let Some(currency) = &row.currency {
                builder = builder.with_currency(currency.as_str());
            }
            if let Some(id) = row.transaction_id {
                builder = builder.with_transaction_id(id);
            } else if let Some(card) = card(row) {
                builder = builder.with_card(card);
            }
            PreparedRequest::Reverse(builder)
        }
        TransactionType::Edit => {
            let mut builder = service.edit(transaction_id);
            if let Some(amount) = row.amount {
                builder = builder.with_amount(amount);
            }
            PreparedRequest::Edit(builder)
        }
        TransactionType::Void => PreparedRequest::Void(service.void(transaction_id)),
        TransactionType::CpcEdit => {
            let mut builder = service.cpc_edit(transaction_id);
            if let Some(data) = cpc_data(row)? {
                builder = builder.with_cpc_data(data);
            }
            PreparedRequest::CpcEdit(builder)
        }
        TransactionType::GiftActivate => {
            let mut builder = service.gift_card_activate(row.amount);
            if let Some(currency) = &row.currency {
                builder = builder.with_currency(currency.as_str());
            }
            if let Some(number) = &row.card_number {
                builder = builder.with_card(GiftCard::Number(number.clone()));
            } else if let Some(token) = &row.token {
                builder = builder.with_card(GiftCard::Token(token.clone()));
            }
            PreparedRequest::GiftActivate(builder)
        }
    };
    Ok(request)
}

/// Executes one row. Failures become result rows rather than errors.
pub async fn process_row(service: &CreditService, index: usize, row: &RequestRow) -> ResultRow {
    let op = row.op.name().to_string();
    let result = match prepare(service, row) {
        Ok(request) => request.execute().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(executed) => ResultRow {
            row: index,
            op,
            status: RowStatus::Approved,
            transaction_id: Some(executed.transaction_id),
            response_code: executed.response_code,
            response_text: executed.response_text,
        },
        Err(e) => {
            debug!(row = index, error = %e, "row failed");
            error_row(index, op, &e)
        }
    }
}

pub fn error_row(index: usize, op: String, error: &PaymentError) -> ResultRow {
    let (status, response_code) = match error {
        PaymentError::IssuerDeclineError { code, .. } => (RowStatus::Declined, code.clone()),
        PaymentError::GatewayError { code, .. } => (RowStatus::Error, code.clone()),
        _ => (RowStatus::Error, String::new()),
    };
    ResultRow {
        row: index,
        op,
        status,
        transaction_id: error.transaction_id(),
        response_code,
        response_text: error.to_string(),
    }
}
