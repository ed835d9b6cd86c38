//! Domain model for discount-code batches.
//!
//! One generation run produces [`DiscountCodeRecord`]s that all carry the
//! same [`SharedCodeFields`]; only `code` and `key` differ between them.
//! Records live in memory until they are exported to CSV or submitted to the
//! platform as [`DiscountCodeDraft`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BatchError;

/// Highest number of codes one generation run may produce.
pub const MAX_QUANTITY: usize = 500_000;

/// Placeholder rendered when a localized field has no usable value.
pub const NO_VALUE_FALLBACK: &str = "-";

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Number of codes to generate, between 1 and [`MAX_QUANTITY`].
    pub quantity: usize,
    /// Total length of each code, prefix included.
    pub total_length: usize,
    /// Optional prefix, normalized to uppercase. Empty means none.
    pub prefix: String,
}

impl GenerationConfig {
    pub fn new(quantity: usize, total_length: usize, prefix: &str) -> Self {
        Self {
            quantity,
            total_length,
            prefix: prefix.to_uppercase(),
        }
    }

    /// Checks the bounds callers gate on before any generation runs.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.quantity < 1 || self.quantity > MAX_QUANTITY {
            return Err(BatchError::Configuration(format!(
                "quantity must be between 1 and {}, got {}",
                MAX_QUANTITY, self.quantity
            )));
        }
        if self.total_length < 1 {
            return Err(BatchError::Configuration(
                "total length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Locale-code to text mapping, ordered by locale.
pub type LocalizedString = BTreeMap<String, String>;

/// One entry of the array-of-pairs wire form of a localized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedValue {
    pub locale: String,
    pub value: String,
}

/// Converts a localized map into the ordered pair sequence sent on the wire.
/// Entries whose value is blank are dropped.
pub fn to_localized_values(localized: &LocalizedString) -> Vec<LocalizedValue> {
    localized
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(locale, value)| LocalizedValue {
            locale: locale.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Rebuilds a localized map from the pair sequence returned by the platform.
pub fn from_localized_values(values: &[LocalizedValue]) -> LocalizedString {
    values
        .iter()
        .map(|value| (value.locale.clone(), value.value.clone()))
        .collect()
}

/// Resolves a localized map for display: the requested locale first, then
/// the fallback order, then the fallback marker.
pub fn format_localized<'a>(
    localized: &'a LocalizedString,
    locale: &str,
    fallback_order: &[String],
    fallback: &'a str,
) -> &'a str {
    std::iter::once(locale)
        .chain(fallback_order.iter().map(String::as_str))
        .filter_map(|candidate| localized.get(candidate))
        .find(|value| !value.trim().is_empty())
        .map_or(fallback, String::as_str)
}

/// Field values copied identically onto every record of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedCodeFields {
    pub name: LocalizedString,
    pub description: LocalizedString,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub max_applications: Option<u32>,
    pub max_applications_per_customer: Option<u32>,
    pub cart_predicate: Option<String>,
    /// Identifiers of the cart discounts every code of the batch links to.
    pub cart_discounts: Vec<String>,
}

impl Default for SharedCodeFields {
    fn default() -> Self {
        Self {
            name: LocalizedString::new(),
            description: LocalizedString::new(),
            is_active: true,
            valid_from: None,
            valid_until: None,
            max_applications: None,
            max_applications_per_customer: None,
            cart_predicate: None,
            cart_discounts: Vec::new(),
        }
    }
}

/// One generated discount code with its copy of the shared fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountCodeRecord {
    pub code: String,
    /// Opaque per-record key, independent of the visible code.
    pub key: String,
    #[serde(flatten)]
    pub fields: SharedCodeFields,
}

impl DiscountCodeRecord {
    pub fn new(code: String, key: String, fields: &SharedCodeFields) -> Self {
        Self {
            code,
            key,
            fields: fields.clone(),
        }
    }
}

/// Reference to a cart discount a code activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountReference {
    pub id: String,
    #[serde(rename = "typeId")]
    pub type_id: String,
}

impl CartDiscountReference {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            type_id: "cart-discount".to_string(),
        }
    }
}

/// Wire payload of the create call.
///
/// Optionals that are empty on the record are omitted entirely rather than
/// sent as empty values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeDraft {
    pub code: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<LocalizedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<LocalizedValue>>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_applications: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_applications_per_customer: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_predicate: Option<String>,
    pub cart_discounts: Vec<CartDiscountReference>,
}

impl DiscountCodeDraft {
    /// Builds the payload for one record, dropping blank optionals.
    pub fn from_record(record: &DiscountCodeRecord) -> Self {
        let fields = &record.fields;
        let name = to_localized_values(&fields.name);
        let description = to_localized_values(&fields.description);

        Self {
            code: record.code.clone(),
            key: record.key.clone(),
            name: (!name.is_empty()).then_some(name),
            description: (!description.is_empty()).then_some(description),
            is_active: fields.is_active,
            valid_from: fields.valid_from,
            valid_until: fields.valid_until,
            max_applications: fields.max_applications,
            max_applications_per_customer: fields.max_applications_per_customer,
            cart_predicate: fields
                .cart_predicate
                .as_deref()
                .map(str::trim)
                .filter(|predicate| !predicate.is_empty())
                .map(str::to_string),
            cart_discounts: fields
                .cart_discounts
                .iter()
                .map(|id| CartDiscountReference::new(id))
                .collect(),
        }
    }
}

/// Cart discount eligible for code linking, as returned by the lookup call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDiscount {
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    /// Localized name in the pair wire form.
    #[serde(default)]
    pub name_all_locales: Vec<LocalizedValue>,
    pub cart_predicate: String,
    pub requires_discount_code: bool,
}

impl CartDiscount {
    /// Display label: the key when present, otherwise the localized name.
    pub fn display_name(&self, locale: &str, fallback_order: &[String]) -> String {
        match &self.key {
            Some(key) => key.clone(),
            None => {
                let name = from_localized_values(&self.name_all_locales);
                format_localized(&name, locale, fallback_order, NO_VALUE_FALLBACK).to_string()
            }
        }
    }
}

/// Create-call response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDiscountCode {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub key: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn localized(entries: &[(&str, &str)]) -> LocalizedString {
        entries
            .iter()
            .map(|(locale, value)| (locale.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn config_bounds_are_enforced() {
        assert!(GenerationConfig::new(1, 1, "").validate().is_ok());
        assert!(GenerationConfig::new(MAX_QUANTITY, 13, "X").validate().is_ok());

        assert!(GenerationConfig::new(0, 13, "").validate().is_err());
        assert!(GenerationConfig::new(MAX_QUANTITY + 1, 13, "").validate().is_err());
        assert!(GenerationConfig::new(10, 0, "").validate().is_err());
    }

    #[test]
    fn config_normalizes_prefix_to_uppercase() {
        let config = GenerationConfig::new(10, 13, "summer26");
        assert_eq!(config.prefix, "SUMMER26");
    }

    #[test]
    fn localized_values_drop_blank_entries_and_keep_locale_order() {
        let name = localized(&[("de", "Rabatt"), ("en", "Discount"), ("fr", "  ")]);

        let values = to_localized_values(&name);

        assert_eq!(
            values,
            vec![
                LocalizedValue {
                    locale: "de".to_string(),
                    value: "Rabatt".to_string()
                },
                LocalizedValue {
                    locale: "en".to_string(),
                    value: "Discount".to_string()
                },
            ]
        );
    }

    #[test]
    fn localized_values_round_trip_back_to_a_map() {
        let name = localized(&[("de", "Rabatt"), ("en", "Discount")]);
        assert_eq!(from_localized_values(&to_localized_values(&name)), name);
    }

    #[test]
    fn format_localized_walks_the_fallback_order() {
        let name = localized(&[("de", "Rabatt"), ("en", "")]);
        let languages = vec!["fr".to_string(), "de".to_string()];

        assert_eq!(format_localized(&name, "de", &[], "-"), "Rabatt");
        assert_eq!(format_localized(&name, "en", &languages, "-"), "Rabatt");
        assert_eq!(format_localized(&name, "en", &[], "-"), "-");
    }

    #[test]
    fn draft_with_blank_optionals_keeps_only_mandatory_fields() {
        let fields = SharedCodeFields {
            cart_discounts: vec!["d1".to_string()],
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("CODE01".to_string(), "key-1".to_string(), &fields);

        let draft = DiscountCodeDraft::from_record(&record);
        let payload = serde_json::to_value(&draft).unwrap();
        let object = payload.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["cartDiscounts", "code", "isActive", "key"]);
        assert_eq!(
            payload["cartDiscounts"],
            serde_json::json!([{ "id": "d1", "typeId": "cart-discount" }])
        );
    }

    #[test]
    fn draft_keeps_populated_optionals() {
        let valid_from = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let fields = SharedCodeFields {
            name: localized(&[("en", "Summer sale")]),
            description: localized(&[("en", "")]),
            valid_from: Some(valid_from),
            max_applications: Some(5),
            cart_predicate: Some("totalPrice > \"10.00 EUR\"".to_string()),
            cart_discounts: vec!["d1".to_string(), "d2".to_string()],
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("CODE02".to_string(), "key-2".to_string(), &fields);

        let draft = DiscountCodeDraft::from_record(&record);

        assert_eq!(
            draft.name,
            Some(vec![LocalizedValue {
                locale: "en".to_string(),
                value: "Summer sale".to_string()
            }])
        );
        // A description holding only blank values is dropped like an empty one.
        assert_eq!(draft.description, None);
        assert_eq!(draft.valid_from, Some(valid_from));
        assert_eq!(draft.max_applications, Some(5));
        assert_eq!(draft.cart_discounts.len(), 2);
    }

    #[test]
    fn blank_cart_predicate_is_dropped() {
        let fields = SharedCodeFields {
            cart_predicate: Some("   ".to_string()),
            cart_discounts: vec!["d1".to_string()],
            ..SharedCodeFields::default()
        };
        let record = DiscountCodeRecord::new("CODE03".to_string(), "key-3".to_string(), &fields);

        assert_eq!(DiscountCodeDraft::from_record(&record).cart_predicate, None);
    }

    #[test]
    fn cart_discount_display_name_prefers_the_key() {
        let discount = CartDiscount {
            id: "d1".to_string(),
            key: Some("summer".to_string()),
            name_all_locales: vec![LocalizedValue {
                locale: "en".to_string(),
                value: "Summer".to_string(),
            }],
            cart_predicate: "true".to_string(),
            requires_discount_code: true,
        };
        assert_eq!(discount.display_name("en", &[]), "summer");

        let unnamed = CartDiscount {
            key: None,
            name_all_locales: Vec::new(),
            ..discount
        };
        assert_eq!(unnamed.display_name("en", &[]), NO_VALUE_FALLBACK);
    }
}
