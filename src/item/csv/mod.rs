/// Generic CSV item writer.
pub mod csv_writer;

/// Export format of a discount-code batch.
pub mod export;
