//! Batch validation of CPF/CNPJ values stored in a CSV column.

use crate::core::mask::format_document;
use crate::core::tax_id::validate_document;
use crate::domain::model::TaxIdValidation;
use crate::utils::error::{GestaoError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const STATUS_VERIFIED: &str = "verificado";
pub const STATUS_FORMAT_ONLY: &str = "somente_formato";
pub const STATUS_INVALID: &str = "invalido";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub verified: usize,
    pub format_only: usize,
    pub invalid: usize,
}

impl BatchSummary {
    pub fn accepted(&self) -> usize {
        self.verified + self.format_only
    }
}

/// Read CSV rows, validate `column`, and write each row back with
/// `formatted`, `kind`, `status` and `reason` columns appended.
pub fn validate_csv<R: Read, W: Write>(reader: R, writer: W, column: &str) -> Result<BatchSummary> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| {
            GestaoError::invalid_input("column", format!("coluna '{}' não encontrada no CSV", column))
        })?;

    let mut wtr = csv::Writer::from_writer(writer);
    let mut out_headers = headers.clone();
    for extra in ["formatted", "kind", "status", "reason"] {
        out_headers.push_field(extra);
    }
    wtr.write_record(&out_headers)?;

    let mut summary = BatchSummary::default();
    for record in rdr.records() {
        let mut record = record?;
        let value = record.get(index).unwrap_or("").trim().to_string();
        let result = validate_document(&value, None);

        let (status, reason) = match &result.outcome {
            TaxIdValidation::Verified => {
                summary.verified += 1;
                (STATUS_VERIFIED, String::new())
            }
            TaxIdValidation::FormatOnly => {
                summary.format_only += 1;
                (STATUS_FORMAT_ONLY, String::new())
            }
            TaxIdValidation::Rejected(reason) => {
                summary.invalid += 1;
                (STATUS_INVALID, reason.to_string())
            }
        };
        summary.total += 1;

        let formatted = if result.is_accepted() {
            format_document(&value)
        } else {
            value.clone()
        };
        let kind = result.kind.map(|k| k.to_string()).unwrap_or_default();

        record.push_field(&formatted);
        record.push_field(&kind);
        record.push_field(status);
        record.push_field(&reason);
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    tracing::info!(
        "📊 Batch finished: {} rows, {} verified, {} format only, {} invalid",
        summary.total,
        summary.verified,
        summary.format_only,
        summary.invalid
    );
    Ok(summary)
}

/// File front-end for [`validate_csv`]; writes to stdout when `output` is `None`.
pub fn validate_csv_file(input: &Path, output: Option<&Path>, column: &str) -> Result<BatchSummary> {
    tracing::info!("📂 Reading {}", input.display());
    let reader = File::open(input)?;
    match output {
        Some(path) => {
            let summary = validate_csv(reader, File::create(path)?, column)?;
            tracing::info!("📁 Output saved to: {}", path.display());
            Ok(summary)
        }
        None => validate_csv(reader, std::io::stdout().lock(), column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, column: &str) -> (BatchSummary, String) {
        let mut out = Vec::new();
        let summary = validate_csv(input.as_bytes(), &mut out, column).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_batch_appends_result_columns() {
        let input = "nome,documento\n\
                     Maria,52998224725\n\
                     ACME,11.222.333/0001-81\n\
                     Nova,12ABC345000177\n\
                     Erro,123\n";

        let (summary, output) = run(input, "documento");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "nome,documento,formatted,kind,status,reason");
        assert_eq!(lines[1], "Maria,52998224725,529.982.247-25,CPF,verificado,");
        assert_eq!(lines[2], "ACME,11.222.333/0001-81,11.222.333/0001-81,CNPJ,verificado,");
        assert_eq!(lines[3], "Nova,12ABC345000177,12.ABC.345/0001-77,CNPJ,somente_formato,");
        assert!(lines[4].starts_with("Erro,123,123,,invalido,"));
        assert_eq!(
            summary,
            BatchSummary {
                total: 4,
                verified: 2,
                format_only: 1,
                invalid: 1
            }
        );
        assert_eq!(summary.accepted(), 3);
    }

    #[test]
    fn test_batch_reports_check_digit_reason() {
        let (summary, output) = run("cpf\n529.982.247-26\n", "cpf");
        assert_eq!(summary.invalid, 1);
        assert!(output.contains("dígito verificador não confere"));
    }

    #[test]
    fn test_batch_missing_column() {
        let mut out = Vec::new();
        let err = validate_csv("nome\nMaria\n".as_bytes(), &mut out, "documento").unwrap_err();
        assert!(matches!(err, GestaoError::InvalidInput { .. }));
    }

    #[test]
    fn test_batch_empty_file_has_header_only() {
        let (summary, output) = run("documento\n", "documento");
        assert_eq!(summary.total, 0);
        assert_eq!(output.trim_end(), "documento,formatted,kind,status,reason");
    }
}
