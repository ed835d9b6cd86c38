//! Streams a generated batch straight into a CSV export file through a
//! chunk-oriented step, without holding the whole batch in memory.
//!
//! Run with: `cargo run --example generate_csv_export`

use std::env::temp_dir;

use chrono::Utc;
use csv::QuoteStyle;

use discount_batch::{
    BatchError,
    core::{
        job::{Job, JobBuilder},
        step::StepBuilder,
    },
    item::{
        csv::{
            csv_writer::CsvItemWriterBuilder,
            export::{CodeCsvRow, CodeCsvRowProcessor, export_file_name},
        },
        generator::code_reader::DiscountCodeReaderBuilder,
    },
    model::{DiscountCodeRecord, GenerationConfig, SharedCodeFields},
};

fn main() -> Result<(), BatchError> {
    env_logger::init();

    let config = GenerationConfig::new(250, 12, "SUMMER26");
    config.validate()?;

    let fields = SharedCodeFields {
        max_applications: Some(1),
        max_applications_per_customer: Some(1),
        cart_discounts: vec!["demo-cart-discount".to_string()],
        ..SharedCodeFields::default()
    };

    let reader = DiscountCodeReaderBuilder::new()
        .config(config)
        .fields(fields)
        .build();

    let processor = CodeCsvRowProcessor;

    let path = temp_dir().join(export_file_name(Utc::now()));
    let writer = CsvItemWriterBuilder::<CodeCsvRow>::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Always)
        .from_path(&path)?;

    let step = StepBuilder::new("generate-codes")
        .chunk::<DiscountCodeRecord, CodeCsvRow>(50)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let job = JobBuilder::new()
        .name("csv-export".to_string())
        .start(&step)
        .build();
    job.run()?;

    let execution = job
        .get_step_execution("generate-codes")
        .expect("step has run");
    println!(
        "Exported {} codes to {}",
        execution.write_count,
        path.display()
    );

    Ok(())
}
