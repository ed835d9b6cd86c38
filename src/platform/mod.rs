//! Remote platform collaborators: the create-record call and the
//! cart-discount lookup.

pub mod client;

use std::env;

use crate::{
    BatchError,
    model::{CartDiscount, CreatedDiscountCode, DiscountCodeDraft},
};

/// Cart discounts fetched per lookup; the platform caps the page size.
pub const CART_DISCOUNT_FETCH_LIMIT: usize = 500;

/// Endpoint used when no explicit API url is configured.
pub const DEFAULT_API_URL: &str = "https://mc-api.eu-central-1.aws.commercetools.com";

/// External collaborator creating discount codes and listing the cart
/// discounts they can link to.
///
/// The importer and the wizard only depend on this trait, so tests can
/// substitute a mock and a caller can wire any transport behind it.
pub trait DiscountCodeService {
    /// Creates one discount code from its draft.
    fn create_discount_code(
        &self,
        draft: &DiscountCodeDraft,
    ) -> Result<CreatedDiscountCode, BatchError>;

    /// Fetches the cart discounts eligible for code linking.
    fn fetch_cart_discounts(&self) -> Result<Vec<CartDiscount>, BatchError>;
}

/// Explicit configuration replacing the host application's ambient context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub api_url: String,
    pub project_key: String,
    /// Locale preferred when rendering localized fields.
    pub data_locale: String,
    /// Fallback order for localized rendering.
    pub project_languages: Vec<String>,
}

impl PlatformConfig {
    pub fn new(api_url: &str, project_key: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            project_key: project_key.to_string(),
            data_locale: "en".to_string(),
            project_languages: Vec::new(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// `DISCOUNT_BATCH_PROJECT_KEY` is required; `DISCOUNT_BATCH_API_URL`
    /// falls back to [`DEFAULT_API_URL`]; `DISCOUNT_BATCH_DATA_LOCALE` and
    /// the comma-separated `DISCOUNT_BATCH_PROJECT_LANGUAGES` are optional.
    pub fn from_env() -> Result<Self, BatchError> {
        let project_key = env::var("DISCOUNT_BATCH_PROJECT_KEY").map_err(|_| {
            BatchError::Configuration("DISCOUNT_BATCH_PROJECT_KEY is not set".to_string())
        })?;
        let api_url =
            env::var("DISCOUNT_BATCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut config = Self::new(&api_url, &project_key);
        if let Ok(data_locale) = env::var("DISCOUNT_BATCH_DATA_LOCALE") {
            config.data_locale = data_locale;
        }
        if let Ok(project_languages) = env::var("DISCOUNT_BATCH_PROJECT_LANGUAGES") {
            config.project_languages = project_languages
                .split(',')
                .map(str::trim)
                .filter(|language| !language.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_a_trailing_slash_off_the_api_url() {
        let config = PlatformConfig::new("https://api.example.com/", "my-project");
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.project_key, "my-project");
        assert_eq!(config.data_locale, "en");
    }
}
