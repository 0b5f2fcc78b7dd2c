use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;

pub const MAX_PO_NUMBER_LEN: usize = 17;
pub const MAX_TAX_AMOUNT_SCALE: u32 = 2;

/// Direct-marketing (mail/telephone order) data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectMarketData {
    pub invoice_number: Option<String>,
    pub ship_day: Option<u32>,
    pub ship_month: Option<u32>,
}

impl DirectMarketData {
    pub fn new(invoice_number: impl Into<String>, ship_day: u32, ship_month: u32) -> Self {
        Self {
            invoice_number: Some(invoice_number.into()),
            ship_day: Some(ship_day),
            ship_month: Some(ship_month),
        }
    }
}

/// Merchant-side fields that travel with a transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionDetails {
    pub memo: Option<String>,
    pub invoice_number: Option<String>,
    pub customer_id: Option<String>,
    /// Caller-supplied correlation token, sent outside `Block1`.
    pub client_transaction_id: Option<String>,
}

impl TransactionDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_invoice_number(mut self, invoice: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice.into());
        self
    }

    pub fn with_customer_id(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(id.into());
        self
    }

    pub fn with_client_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.client_transaction_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    NotUsed,
    SalesTax,
    TaxExempt,
}

impl TaxType {
    pub fn as_wire(&self) -> &'static str {
        match self {
            TaxType::NotUsed => "NOTUSED",
            TaxType::SalesTax => "SALESTAX",
            TaxType::TaxExempt => "TAXEXEMPT",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Commercial (purchasing) card data.
///
/// Range checks run in the mutators, so an out-of-range value is rejected when
/// it is assigned rather than when the transaction is submitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpcData {
    po_number: Option<String>,
    tax_type: Option<TaxType>,
    tax_amount: Option<Decimal>,
}

impl CpcData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_po_number(mut self, po_number: impl Into<String>) -> Result<Self, PaymentError> {
        let po_number = po_number.into();
        if po_number.chars().count() > MAX_PO_NUMBER_LEN {
            return Err(PaymentError::ValidationError(format!(
                "Card holder PO number must be {} characters or fewer.",
                MAX_PO_NUMBER_LEN
            )));
        }
        self.po_number = Some(po_number);
        Ok(self)
    }

    pub fn with_tax_type(mut self, tax_type: TaxType) -> Self {
        self.tax_type = Some(tax_type);
        self
    }

    pub fn with_tax_amount(mut self, tax_amount: Decimal) -> Result<Self, PaymentError> {
        if tax_amount.scale() > MAX_TAX_AMOUNT_SCALE {
            return Err(PaymentError::ValidationError(format!(
                "Tax amount can have at most {} decimal places.",
                MAX_TAX_AMOUNT_SCALE
            )));
        }
        self.tax_amount = Some(tax_amount);
        Ok(self)
    }

    pub fn po_number(&self) -> Option<&str> {
        self.po_number.as_deref()
    }

    pub fn tax_type(&self) -> Option<TaxType> {
        self.tax_type
    }

    pub fn tax_amount(&self) -> Option<Decimal> {
        self.tax_amount
    }
}
