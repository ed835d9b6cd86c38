use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};

use discount_batch::{
    core::item::ItemReader,
    item::generator::code_reader::{CODE_ALPHABET, DiscountCodeReaderBuilder, generate_batch},
    model::{DiscountCodeDraft, GenerationConfig, SharedCodeFields},
};

#[test]
fn large_batch_honors_quantity_length_and_alphabet() {
    let config = GenerationConfig::new(1_000, 13, "summer26");
    config.validate().expect("configuration is in bounds");

    let fields = SharedCodeFields {
        max_applications: Some(1),
        max_applications_per_customer: Some(1),
        cart_discounts: vec!["d1".to_string()],
        ..SharedCodeFields::default()
    };

    let reader = DiscountCodeReaderBuilder::new()
        .config(config)
        .fields(fields.clone())
        .build_with_rng(StdRng::seed_from_u64(2026));

    let records = reader.read_all();
    assert_eq!(records.len(), 1_000);

    let mut keys = HashSet::new();
    for record in &records {
        assert_eq!(record.code.len(), 13);
        assert!(record.code.starts_with("SUMMER26-"));
        assert!(
            record.code["SUMMER26-".len()..]
                .bytes()
                .all(|symbol| CODE_ALPHABET.contains(&symbol))
        );

        // Shared fields are copied identically; only code and key vary.
        assert_eq!(record.fields, fields);
        assert!(keys.insert(record.key.clone()));
    }

    // The reader is exhausted after the requested quantity.
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn generated_records_map_to_mandatory_only_drafts() {
    let fields = SharedCodeFields {
        cart_discounts: vec!["d1".to_string()],
        ..SharedCodeFields::default()
    };
    let records = generate_batch(&GenerationConfig::new(3, 8, ""), &fields);

    for record in &records {
        let draft = DiscountCodeDraft::from_record(record);
        let payload = serde_json::to_value(&draft).unwrap();
        let object = payload.as_object().unwrap();

        let mut columns: Vec<&str> = object.keys().map(String::as_str).collect();
        columns.sort_unstable();
        assert_eq!(columns, vec!["cartDiscounts", "code", "isActive", "key"]);
    }
}
