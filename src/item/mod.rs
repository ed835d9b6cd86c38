/// This module provides the discount-code generator item reader.
pub mod generator;

/// This module provides the CSV item writer and the batch export format.
pub mod csv;

/// This module provides a logger item writer, useful for debugging purposes.
pub mod logger;
