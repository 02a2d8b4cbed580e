//! Tabular export
//!
//! Encodes an ordered record list into a comma-delimited document from a list
//! of column definitions. Rows keep input order, numbers are formatted per
//! column and text is quoted only when it contains a delimiter, a quote or a
//! line break. Lines are separated by `\n` with no trailing newline.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::catalog::RnaCategory;
use crate::models::{ClinicalSample, DetailedAnalysisResult, ExpressionRecord};
use crate::types::{AppError, AppResult};

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// How a numeric cell is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Fixed-point with the given number of decimals
    Fixed(usize),
    /// Scientific notation with the given number of mantissa decimals
    Scientific(usize),
    Verbatim,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(f64),
    Text(String),
}

pub struct Column<R> {
    pub header: &'static str,
    pub extract: fn(&R) -> Field,
    pub format: Format,
}

impl<R> Column<R> {
    pub fn new(header: &'static str, extract: fn(&R) -> Field, format: Format) -> Self {
        Self { header, extract, format }
    }

    fn render(&self, record: &R) -> String {
        match ((self.extract)(record), self.format) {
            (Field::Number(v), Format::Fixed(decimals)) => format!("{:.*}", decimals, v),
            (Field::Number(v), Format::Scientific(decimals)) => scientific(v, decimals),
            (Field::Number(v), Format::Verbatim) => v.to_string(),
            (Field::Text(s), _) => s,
        }
    }
}

/// Scientific notation with an explicit exponent sign, e.g. `1.2346e-5`,
/// `5.0000e+0`
pub fn scientific(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*e}", decimals, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Encode records as a CSV document: a header line, then one line per record
pub fn encode_csv<R>(records: &[R], columns: &[Column<R>]) -> AppResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| AppError::Internal(format!("CSV encoding failed: {}", e));

    writer
        .write_record(columns.iter().map(|c| c.header))
        .map_err(csv_err)?;
    for record in records {
        writer
            .write_record(columns.iter().map(|c| c.render(record)))
            .map_err(csv_err)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
}

/// A document ready to hand to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// `{TUMOR_CODE}_{CATEGORY|GENE}_{Kind}.csv`
pub fn export_filename(tumor_code: &str, subject: &str, kind: &str) -> String {
    format!("{}_{}_{}.csv", tumor_code, subject, kind)
}

pub fn expression_columns() -> Vec<Column<ExpressionRecord>> {
    vec![
        Column::new("GeneID", |r: &ExpressionRecord| Field::Text(r.gene_id.clone()), Format::Verbatim),
        Column::new("Symbol", |r: &ExpressionRecord| Field::Text(r.symbol.clone()), Format::Verbatim),
        Column::new("Category", |r: &ExpressionRecord| Field::Text(r.category.to_string()), Format::Verbatim),
        Column::new("Tumor_Expression_Log2CPM", |r: &ExpressionRecord| Field::Number(r.tumor_expression), Format::Fixed(4)),
        Column::new("Normal_Expression_Log2CPM", |r: &ExpressionRecord| Field::Number(r.normal_expression), Format::Fixed(4)),
        Column::new("Log2FC", |r: &ExpressionRecord| Field::Number(r.fold_change), Format::Fixed(4)),
        Column::new("P_Value", |r: &ExpressionRecord| Field::Number(r.p_value), Format::Scientific(4)),
        Column::new("FDR", |r: &ExpressionRecord| Field::Number(r.fdr), Format::Scientific(4)),
        Column::new("Evidence", |r: &ExpressionRecord| Field::Text(r.evidence.clone()), Format::Verbatim),
        Column::new("Localization", |r: &ExpressionRecord| Field::Text(r.localization.clone()), Format::Verbatim),
    ]
}

/// A clinical sample with the report context it is exported under
pub struct SampleRow<'a> {
    pub tumor_type: &'a str,
    pub gene: &'a str,
    pub sample: &'a ClinicalSample,
}

pub fn sample_columns<'a>() -> Vec<Column<SampleRow<'a>>> {
    vec![
        Column::new("Sample_ID", |r: &SampleRow<'a>| Field::Text(r.sample.sample_id.clone()), Format::Verbatim),
        Column::new("Tumor_Type", |r: &SampleRow<'a>| Field::Text(r.tumor_type.to_string()), Format::Verbatim),
        Column::new("Gene", |r: &SampleRow<'a>| Field::Text(r.gene.to_string()), Format::Verbatim),
        Column::new("Expression_Level", |r: &SampleRow<'a>| Field::Number(r.sample.expression_level), Format::Fixed(4)),
        Column::new("Group", |r: &SampleRow<'a>| Field::Text(r.sample.group.clone()), Format::Verbatim),
        Column::new("Survival_Months", |r: &SampleRow<'a>| Field::Number(r.sample.survival_months), Format::Fixed(1)),
        Column::new("Vital_Status", |r: &SampleRow<'a>| Field::Text(r.sample.status.as_str().to_string()), Format::Verbatim),
    ]
}

pub fn export_expression(
    tumor_code: &str,
    category: RnaCategory,
    records: &[ExpressionRecord],
) -> AppResult<ExportArtifact> {
    Ok(ExportArtifact {
        filename: export_filename(tumor_code, category.as_str(), "GlycoRNA_Data"),
        content_type: CSV_CONTENT_TYPE,
        body: encode_csv(records, &expression_columns())?,
    })
}

pub fn export_samples(report: &DetailedAnalysisResult) -> AppResult<ExportArtifact> {
    let rows: Vec<SampleRow<'_>> = report
        .survival
        .samples
        .iter()
        .map(|sample| SampleRow {
            tumor_type: &report.tumor_type,
            gene: &report.gene_symbol,
            sample,
        })
        .collect();

    Ok(ExportArtifact {
        filename: export_filename(&report.tumor_type, &report.gene_symbol, "Clinical_Samples"),
        content_type: CSV_CONTENT_TYPE,
        body: encode_csv(&rows, &sample_columns())?,
    })
}
