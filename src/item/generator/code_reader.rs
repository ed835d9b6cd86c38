use std::cell::{Cell, RefCell};

use chrono::Utc;
use log::debug;
use rand::{Rng, RngExt, SeedableRng, rngs::{StdRng, SysRng}};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    model::{DiscountCodeRecord, GenerationConfig, SharedCodeFields},
};

/// The 36-symbol alphabet codes are drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random characters appended to the key timestamp.
const KEY_RANDOM_LENGTH: usize = 9;

/// Reader producing exactly `quantity` discount-code records, then end of
/// input.
///
/// Every record carries a copy of the shared fields; only `code` and `key`
/// differ. The reader assumes a validated [`GenerationConfig`]; callers gate
/// on [`GenerationConfig::validate`] before building one. The random source
/// is a type parameter so generation is deterministic under test.
pub struct DiscountCodeReader<R: Rng> {
    config: GenerationConfig,
    fields: SharedCodeFields,
    generated: Cell<usize>,
    timestamp_millis: i64,
    rng: RefCell<R>,
}

impl<R: Rng> ItemReader<DiscountCodeRecord> for DiscountCodeReader<R> {
    fn read(&self) -> ItemReaderResult<DiscountCodeRecord> {
        let sequence = self.generated.get();
        if sequence == self.config.quantity {
            return Ok(None);
        }
        self.generated.set(sequence + 1);

        let mut rng = self.rng.borrow_mut();
        let code = random_code(&mut *rng, &self.config);
        let key = random_key(&mut *rng, self.timestamp_millis, sequence);

        let record = DiscountCodeRecord::new(code, key, &self.fields);
        debug!("Generated code: {}", record.code);
        Ok(Some(record))
    }
}

impl<R: Rng> DiscountCodeReader<R> {
    /// Drains the reader into the in-memory batch previews work on.
    pub fn read_all(&self) -> Vec<DiscountCodeRecord> {
        let mut records = Vec::with_capacity(self.config.quantity - self.generated.get());
        while let Ok(Some(record)) = self.read() {
            records.push(record);
        }
        records
    }
}

/// Generates a whole batch in memory with an entropy-seeded random source.
pub fn generate_batch(
    config: &GenerationConfig,
    fields: &SharedCodeFields,
) -> Vec<DiscountCodeRecord> {
    DiscountCodeReaderBuilder::new()
        .config(config.clone())
        .fields(fields.clone())
        .build()
        .read_all()
}

/// Draws `length` characters uniformly, with replacement, from
/// [`CODE_ALPHABET`].
fn random_chars<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Builds one code. The prefix is joined with a dash, and prefix plus dash
/// count against the total length; when no room is left for a random suffix
/// the prefix is dropped and the whole code is random at the requested
/// length.
fn random_code<R: Rng>(rng: &mut R, config: &GenerationConfig) -> String {
    let prefix = config.prefix.to_uppercase();
    if prefix.is_empty() {
        return random_chars(rng, config.total_length);
    }

    let suffix_length = config.total_length as i64 - prefix.len() as i64 - 1;
    if suffix_length > 0 {
        format!("{}-{}", prefix, random_chars(rng, suffix_length as usize))
    } else {
        random_chars(rng, config.total_length)
    }
}

/// Opaque per-record key: timestamp, per-run sequence number, random tail.
/// The sequence number keeps keys distinct within a run even when the random
/// source repeats itself.
fn random_key<R: Rng>(rng: &mut R, timestamp_millis: i64, sequence: usize) -> String {
    format!(
        "key-{}-{}-{}",
        timestamp_millis,
        sequence,
        random_chars(rng, KEY_RANDOM_LENGTH)
    )
}

#[derive(Default)]
pub struct DiscountCodeReaderBuilder {
    config: Option<GenerationConfig>,
    fields: SharedCodeFields,
    timestamp_millis: Option<i64>,
}

impl DiscountCodeReaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn fields(mut self, fields: SharedCodeFields) -> Self {
        self.fields = fields;
        self
    }

    /// Overrides the key timestamp; defaults to now.
    pub fn timestamp_millis(mut self, timestamp_millis: i64) -> Self {
        self.timestamp_millis = Some(timestamp_millis);
        self
    }

    /// Builds a reader drawing from operating-system entropy.
    pub fn build(self) -> DiscountCodeReader<StdRng> {
        self.build_with_rng(StdRng::try_from_rng(&mut SysRng).expect("failed to seed StdRng from system entropy"))
    }

    /// Builds a reader drawing from the given source.
    pub fn build_with_rng<R: Rng>(self, rng: R) -> DiscountCodeReader<R> {
        let config = self
            .config
            .expect("Generation config is required for building a reader");
        DiscountCodeReader {
            generated: Cell::new(0),
            timestamp_millis: self
                .timestamp_millis
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            config,
            fields: self.fields,
            rng: RefCell::new(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Random source stuck on a constant low output; every draw lands on
    /// the first alphabet symbol.
    struct FixedRng;

    impl rand::TryRng for FixedRng {
        type Error = std::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(1)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(1)
        }

        fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
            dst.fill(0);
            Ok(())
        }
    }

    fn reader_with_seed(config: GenerationConfig, seed: u64) -> DiscountCodeReader<StdRng> {
        DiscountCodeReaderBuilder::new()
            .config(config)
            .build_with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn reader_produces_exactly_the_requested_quantity() {
        let reader = reader_with_seed(GenerationConfig::new(5, 8, ""), 42);

        for _ in 0..5 {
            assert!(reader.read().unwrap().is_some());
        }
        assert!(reader.read().unwrap().is_none());
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn codes_only_use_the_uppercase_alphanumeric_alphabet() {
        let reader = reader_with_seed(GenerationConfig::new(50, 13, ""), 7);

        for record in reader.read_all() {
            assert_eq!(record.code.len(), 13);
            assert!(
                record
                    .code
                    .bytes()
                    .all(|symbol| CODE_ALPHABET.contains(&symbol))
            );
        }
    }

    #[test]
    fn prefix_and_dash_count_against_the_total_length() {
        let reader = reader_with_seed(GenerationConfig::new(10, 13, "summer26"), 3);

        for record in reader.read_all() {
            assert_eq!(record.code.len(), 13);
            assert!(record.code.starts_with("SUMMER26-"));
            let suffix = &record.code["SUMMER26-".len()..];
            assert_eq!(suffix.len(), 4);
            assert!(suffix.bytes().all(|symbol| CODE_ALPHABET.contains(&symbol)));
        }
    }

    #[test]
    fn prefix_longer_than_the_total_length_is_dropped() {
        // Prefix plus dash would leave no room for a random suffix.
        let reader = reader_with_seed(GenerationConfig::new(10, 6, "LONGPREFIX"), 11);

        for record in reader.read_all() {
            assert_eq!(record.code.len(), 6);
            assert!(!record.code.contains('-'));
        }
    }

    #[test]
    fn mocked_source_yields_the_documented_code_shape() {
        let reader = DiscountCodeReaderBuilder::new()
            .config(GenerationConfig::new(3, 8, "AB"))
            .timestamp_millis(1_750_000_000_000)
            .build_with_rng(FixedRng);

        let records = reader.read_all();

        assert_eq!(records.len(), 3);

        // A constant source repeats a single alphabet symbol.
        let symbol = records[0].code.as_bytes()["AB-".len()];
        assert!(CODE_ALPHABET.contains(&symbol));
        for record in &records {
            assert_eq!(record.code.len(), 8);
            assert!(record.code.starts_with("AB-"));
            assert!(record.code["AB-".len()..].bytes().all(|b| b == symbol));
        }

        // Keys stay distinct even though the random source repeats.
        let tail = String::from_utf8(vec![symbol; 9]).unwrap();
        assert_eq!(records[0].key, format!("key-1750000000000-0-{tail}"));
        assert_eq!(records[1].key, format!("key-1750000000000-1-{tail}"));
        assert_eq!(records[2].key, format!("key-1750000000000-2-{tail}"));
    }

    #[test]
    fn records_share_every_field_except_code_and_key() {
        let fields = SharedCodeFields {
            max_applications: Some(3),
            cart_discounts: vec!["d1".to_string()],
            ..SharedCodeFields::default()
        };
        let reader = DiscountCodeReaderBuilder::new()
            .config(GenerationConfig::new(4, 10, "AB"))
            .fields(fields.clone())
            .build_with_rng(StdRng::seed_from_u64(9));

        let records = reader.read_all();

        assert_eq!(records.len(), 4);
        for record in &records {
            assert_eq!(record.fields, fields);
        }
        for pair in records.windows(2) {
            assert_ne!(pair[0].key, pair[1].key);
        }
    }

    #[test]
    fn same_seed_generates_the_same_codes() {
        let config = GenerationConfig::new(6, 12, "X");
        let first: Vec<String> = reader_with_seed(config.clone(), 123)
            .read_all()
            .into_iter()
            .map(|record| record.code)
            .collect();
        let second: Vec<String> = reader_with_seed(config, 123)
            .read_all()
            .into_iter()
            .map(|record| record.code)
            .collect();

        assert_eq!(first, second);
    }
}
