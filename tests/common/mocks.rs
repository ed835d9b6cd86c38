//! Mock implementation of the platform service.
use mockall::mock;

use discount_batch::{
    BatchError,
    model::{CartDiscount, CreatedDiscountCode, DiscountCodeDraft},
    platform::DiscountCodeService,
};

mock! {
    pub PlatformService {}
    impl DiscountCodeService for PlatformService {
        fn create_discount_code(
            &self,
            draft: &DiscountCodeDraft,
        ) -> Result<CreatedDiscountCode, BatchError>;
        fn fetch_cart_discounts(&self) -> Result<Vec<CartDiscount>, BatchError>;
    }
}

/// Create-call response echoing the submitted draft.
pub fn created_from(draft: &DiscountCodeDraft, id: &str) -> CreatedDiscountCode {
    CreatedDiscountCode {
        id: id.to_string(),
        code: draft.code.clone(),
        key: Some(draft.key.clone()),
        is_active: draft.is_active,
    }
}
