use crate::domain::market::TaxType;
use crate::domain::transaction::TransactionType;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

/// One requested operation in a batch file.
///
/// Only the columns an operation needs have to be filled in; empty cells
/// deserialize to `None`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RequestRow {
    pub op: TransactionType,
    #[serde(default, deserialize_with = "decimal_cell")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub card_number: Option<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<u32>,
    pub cvv: Option<String>,
    pub token: Option<String>,
    pub transaction_id: Option<i64>,
    pub allow_duplicates: Option<bool>,
    pub po_number: Option<String>,
    pub tax_type: Option<TaxType>,
    #[serde(default, deserialize_with = "decimal_cell")]
    pub tax_amount: Option<Decimal>,
}

/// Parses the cell text directly so the written scale survives (`50.00`
/// stays `50.00`).
fn decimal_cell<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|cell| Decimal::from_str(&cell).map_err(serde::de::Error::custom))
        .transpose()
}

/// Reads request rows from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so trailing optional columns may be left off.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes rows; a malformed row yields an error without
    /// ending the stream.
    pub fn requests(self) -> impl Iterator<Item = Result<RequestRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
