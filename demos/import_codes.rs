//! Generates a small batch and imports it against an in-process stand-in
//! for the platform, printing live progress after every record.
//!
//! Run with: `cargo run --example import_codes`

use std::cell::Cell;

use discount_batch::{
    BatchError,
    import::{BatchImporter, ImportProgress, ProgressListener},
    item::generator::code_reader::generate_batch,
    model::{
        CartDiscount, CreatedDiscountCode, DiscountCodeDraft, GenerationConfig, SharedCodeFields,
    },
    platform::DiscountCodeService,
};

/// Stand-in for the platform: every third create call fails.
struct FlakyService {
    calls: Cell<usize>,
}

impl DiscountCodeService for FlakyService {
    fn create_discount_code(
        &self,
        draft: &DiscountCodeDraft,
    ) -> Result<CreatedDiscountCode, BatchError> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if call % 3 == 2 {
            return Err(BatchError::Service("simulated outage".to_string()));
        }
        Ok(CreatedDiscountCode {
            id: format!("id-{call}"),
            code: draft.code.clone(),
            key: Some(draft.key.clone()),
            is_active: draft.is_active,
        })
    }

    fn fetch_cart_discounts(&self) -> Result<Vec<CartDiscount>, BatchError> {
        Ok(Vec::new())
    }
}

struct ConsoleListener;

impl ProgressListener for ConsoleListener {
    fn on_progress(&self, progress: &ImportProgress) {
        println!(
            "{}/{} imported, {} failed",
            progress.current, progress.total, progress.failed
        );
    }
}

fn main() -> Result<(), BatchError> {
    env_logger::init();

    let config = GenerationConfig::new(10, 10, "DEMO");
    config.validate()?;

    let fields = SharedCodeFields {
        cart_discounts: vec!["demo-cart-discount".to_string()],
        ..SharedCodeFields::default()
    };
    let records = generate_batch(&config, &fields);

    let service = FlakyService {
        calls: Cell::new(0),
    };
    let listener = ConsoleListener;

    let importer = BatchImporter::with_listener(&service, &listener);
    let progress = importer.import(&records);

    println!(
        "Import finished: {} attempted, {} succeeded, {} failed",
        progress.current,
        progress.succeeded(),
        progress.failed
    );

    Ok(())
}
