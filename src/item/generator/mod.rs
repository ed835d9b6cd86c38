/// Item reader generating batches of discount-code records.
pub mod code_reader;
