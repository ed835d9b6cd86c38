use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{
    BatchError,
    model::{CartDiscount, CreatedDiscountCode, DiscountCodeDraft},
};

use super::{CART_DISCOUNT_FETCH_LIMIT, DiscountCodeService, PlatformConfig};

/// Blocking HTTP implementation of [`DiscountCodeService`].
///
/// One request is in flight at a time; the import loop awaits each create
/// call before submitting the next record.
pub struct PlatformClient {
    config: PlatformConfig,
    http: Client,
}

/// Paged envelope of the cart-discount lookup.
#[derive(Debug, Deserialize)]
struct CartDiscountPage {
    results: Vec<CartDiscount>,
}

/// Error body returned by the platform on a failed call.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn discount_codes_url(&self) -> String {
        format!(
            "{}/{}/discount-codes",
            self.config.api_url, self.config.project_key
        )
    }

    fn cart_discounts_url(&self) -> String {
        format!(
            "{}/{}/cart-discounts",
            self.config.api_url, self.config.project_key
        )
    }
}

impl DiscountCodeService for PlatformClient {
    fn create_discount_code(
        &self,
        draft: &DiscountCodeDraft,
    ) -> Result<CreatedDiscountCode, BatchError> {
        let url = self.discount_codes_url();
        debug!("Creating discount code {} at {}", draft.code, url);

        let response = self.http.post(&url).json(draft).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorBody>()
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Failed to create discount code: {status}"));
            return Err(BatchError::Service(message));
        }

        Ok(response.json::<CreatedDiscountCode>()?)
    }

    fn fetch_cart_discounts(&self) -> Result<Vec<CartDiscount>, BatchError> {
        let url = self.cart_discounts_url();
        debug!("Fetching cart discounts from {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("where", "requiresDiscountCode=true"),
                ("limit", CART_DISCOUNT_FETCH_LIMIT.to_string().as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(BatchError::Service(format!(
                "Failed to fetch cart discounts: {}",
                response.status()
            )));
        }

        let page = response.json::<CartDiscountPage>()?;
        Ok(page.results)
    }
}
