//! CSV export of list rows.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Appends rows to a CSV document, writing the header with the first row.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            rows: 0,
        }
    }

    pub fn write_rows<T: Serialize>(&mut self, rows: &[T]) -> Result<(), ExportError> {
        for row in rows {
            self.writer.serialize(row)?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W, ExportError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }
}

/// Writes `rows` as a complete CSV document.
pub fn export_csv<T, W>(rows: &[T], writer: W) -> Result<W, ExportError>
where
    T: Serialize,
    W: Write,
{
    let mut exporter = CsvExporter::new(writer);
    exporter.write_rows(rows)?;
    exporter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::Ticket;

    #[test]
    fn exports_header_and_rows_in_order() {
        let rows = vec![
            Ticket {
                id: 7,
                subject: "Printer, jammed".to_string(),
                status: 1,
                ..Ticket::default()
            },
            Ticket {
                id: 3,
                subject: "Refund".to_string(),
                status: 2,
                agent_id: Some(4),
                ..Ticket::default()
            },
        ];

        let out = export_csv(&rows, Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,subject,status,priority,customer_id,agent_id,created_at,deleted_at"
        );
        assert_eq!(lines[1], "7,\"Printer, jammed\",1,,,,,");
        assert_eq!(lines[2], "3,Refund,2,,,4,,");
    }

    #[test]
    fn exporter_counts_rows_across_pages() {
        let mut exporter = CsvExporter::new(Vec::new());
        exporter.write_rows(&[Ticket::default()]).unwrap();
        exporter.write_rows(&[Ticket::default(), Ticket::default()]).unwrap();

        assert_eq!(exporter.rows(), 3);
        let text = String::from_utf8(exporter.finish().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
