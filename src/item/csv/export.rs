use std::path::Path;

use chrono::{DateTime, Utc};
use csv::QuoteStyle;
use serde::Serialize;

use crate::{
    BatchError,
    core::item::{ItemProcessor, ItemProcessorResult, ItemWriter},
    model::DiscountCodeRecord,
};

use super::csv_writer::CsvItemWriterBuilder;

/// One line of the export file.
///
/// Column set and order are fixed; `cartDiscounts` joins the linked
/// identifiers with semicolons so the list survives the comma-delimited
/// format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCsvRow {
    pub code: String,
    pub key: String,
    pub is_active: bool,
    pub valid_from: String,
    pub valid_until: String,
    pub max_applications: Option<u32>,
    pub max_applications_per_customer: Option<u32>,
    pub cart_predicate: String,
    pub cart_discounts: String,
}

impl From<&DiscountCodeRecord> for CodeCsvRow {
    fn from(record: &DiscountCodeRecord) -> Self {
        let fields = &record.fields;
        Self {
            code: record.code.clone(),
            key: record.key.clone(),
            is_active: fields.is_active,
            valid_from: fields.valid_from.map(format_timestamp).unwrap_or_default(),
            valid_until: fields.valid_until.map(format_timestamp).unwrap_or_default(),
            max_applications: fields.max_applications,
            max_applications_per_customer: fields.max_applications_per_customer,
            cart_predicate: fields.cart_predicate.clone().unwrap_or_default(),
            cart_discounts: fields.cart_discounts.join(";"),
        }
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

/// Maps generated records to CSV rows, so a generation step can stream
/// straight into the export file without holding the batch in memory.
#[derive(Default)]
pub struct CodeCsvRowProcessor;

impl ItemProcessor<DiscountCodeRecord, CodeCsvRow> for CodeCsvRowProcessor {
    fn process(&self, item: &DiscountCodeRecord) -> ItemProcessorResult<CodeCsvRow> {
        Ok(CodeCsvRow::from(item))
    }
}

/// File name of an export started at `timestamp`.
pub fn export_file_name(timestamp: DateTime<Utc>) -> String {
    format!("discount-codes-{}.csv", timestamp.timestamp_millis())
}

/// Writes a previewed batch to `path`: header row first, every field
/// double-quoted.
pub fn export<P: AsRef<Path>>(records: &[DiscountCodeRecord], path: P) -> Result<(), BatchError> {
    let writer = CsvItemWriterBuilder::<CodeCsvRow>::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    let rows: Vec<CodeCsvRow> = records.iter().map(CodeCsvRow::from).collect();
    writer.write(&rows)?;
    ItemWriter::<CodeCsvRow>::flush(&writer)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::SharedCodeFields;

    #[test]
    fn row_renders_blank_optionals_as_empty_cells() {
        let record = DiscountCodeRecord::new(
            "CODE01".to_string(),
            "key-1".to_string(),
            &SharedCodeFields::default(),
        );

        let row = CodeCsvRow::from(&record);

        assert_eq!(row.valid_from, "");
        assert_eq!(row.valid_until, "");
        assert_eq!(row.max_applications, None);
        assert_eq!(row.cart_predicate, "");
        assert_eq!(row.cart_discounts, "");
    }

    #[test]
    fn row_joins_cart_discounts_with_semicolons() {
        let single = SharedCodeFields {
            cart_discounts: vec!["d1".to_string()],
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("C".to_string(), "k".to_string(), &single);
        assert_eq!(CodeCsvRow::from(&record).cart_discounts, "d1");

        let linked = SharedCodeFields {
            cart_discounts: vec!["d1".to_string(), "d2".to_string()],
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("C".to_string(), "k".to_string(), &linked);
        assert_eq!(CodeCsvRow::from(&record).cart_discounts, "d1;d2");
    }

    #[test]
    fn row_formats_timestamps_as_rfc3339() {
        let fields = SharedCodeFields {
            valid_from: Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()),
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("C".to_string(), "k".to_string(), &fields);

        assert_eq!(CodeCsvRow::from(&record).valid_from, "2026-06-01T00:00:00+00:00");
    }

    #[test]
    fn export_file_name_carries_the_millisecond_stamp() {
        let timestamp = Utc.timestamp_millis_opt(1_750_000_000_000).unwrap();
        assert_eq!(
            export_file_name(timestamp),
            "discount-codes-1750000000000.csv"
        );
    }
}
