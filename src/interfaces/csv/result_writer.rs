use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Outcome of one batch row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultRow {
    pub row: usize,
    pub op: String,
    pub status: RowStatus,
    pub transaction_id: Option<i64>,
    pub response_code: String,
    pub response_text: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Approved,
    Declined,
    Error,
}

/// Writes result rows as CSV with a header line.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, row: &ResultRow) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_rows() {
        let mut buffer = Vec::new();
        {
            let mut writer = ResultWriter::new(&mut buffer);
            writer
                .write(&ResultRow {
                    row: 1,
                    op: "charge".into(),
                    status: RowStatus::Approved,
                    transaction_id: Some(1000000),
                    response_code: "00".into(),
                    response_text: "APPROVAL".into(),
                })
                .unwrap();
            writer
                .write(&ResultRow {
                    row: 2,
                    op: "void".into(),
                    status: RowStatus::Error,
                    transaction_id: None,
                    response_code: String::new(),
                    response_text: "Invalid transaction id.".into(),
                })
                .unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "row,op,status,transaction_id,response_code,response_text\n\
             1,charge,approved,1000000,00,APPROVAL\n\
             2,void,error,,,Invalid transaction id.\n"
        );
    }
}
