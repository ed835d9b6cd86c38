/*!
 # Discount-Batch for Rust

 A toolkit for bulk generation and import of promotional discount codes.
 An operator configures a batch, generates the codes locally, previews
 them, exports them as CSV, and submits them one-by-one to the e-commerce
 platform for creation.

 ## Core Concepts

 The crate is organized as a small batch pipeline:

 - **Job:** A named sequence of steps executed in order.
 - **Step:** A chunk-oriented phase that reads items, processes them and
   writes them out, with per-execution counters and a configurable error
   skip limit.
 - **ItemReader:** Retrieval of input one item at a time. The discount-code
   generator is a reader producing exactly the requested quantity of
   records.
 - **ItemProcessor:** Business logic between reading and writing, for
   example mapping generated records to CSV rows.
 - **ItemWriter:** Output of a step, one chunk at a time, for example the
   CSV export writer.

 On top of the pipeline sit the domain pieces: the [`wizard`](crate::wizard)
 gating the configure → fields → cart-discounts → preview → import flow,
 and the [`import`](crate::import) module submitting a finalized batch to
 the platform one record at a time while tallying failures.

 ## Getting Started

```rust
use discount_batch::item::generator::code_reader::generate_batch;
use discount_batch::model::{GenerationConfig, SharedCodeFields};

let config = GenerationConfig::new(3, 13, "SUMMER26");
config.validate().expect("configuration is in bounds");

let fields = SharedCodeFields {
    cart_discounts: vec!["cart-discount-id".to_string()],
    ..SharedCodeFields::default()
};

let batch = generate_batch(&config, &fields);
assert_eq!(batch.len(), 3);
for record in &batch {
    assert_eq!(record.code.len(), 13);
    assert!(record.code.starts_with("SUMMER26-"));
}
```

 Generated batches can be exported with
 [`item::csv::export::export`](crate::item::csv::export::export) and
 submitted with a [`BatchImporter`](crate::import::BatchImporter) backed by
 any [`DiscountCodeService`](crate::platform::DiscountCodeService)
 implementation, such as the bundled blocking
 [`PlatformClient`](crate::platform::client::PlatformClient).
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Sequential batch importer
pub mod import;

/// Set of item readers / writers (for example: generator reader and CSV writer)
pub mod item;

/// Domain model for discount-code batches
pub mod model;

/// Remote platform collaborators
pub mod platform;

/// Multi-step flow gating generation, preview, export and import
pub mod wizard;
