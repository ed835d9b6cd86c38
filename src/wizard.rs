//! Linear flow driving configuration, generation, preview, export and
//! import of one batch.
//!
//! The wizard gates forward transitions and owns the in-memory batch for
//! the duration of one generation/import cycle; restarting the flow
//! discards it.

use std::path::Path;

use log::{debug, warn};

use crate::{
    BatchError,
    import::{BatchImporter, ImportProgress, NoopProgressListener, ProgressListener},
    item::csv::export,
    item::generator::code_reader::generate_batch,
    model::{CartDiscount, DiscountCodeRecord, GenerationConfig, SharedCodeFields},
    platform::DiscountCodeService,
};

/// Wizard steps in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Configure,
    Fields,
    CartDiscounts,
    Preview,
    Import,
}

/// Owns the operator's working state for one generation/import cycle.
pub struct Wizard {
    step: WizardStep,
    config: GenerationConfig,
    fields: SharedCodeFields,
    candidates: Vec<CartDiscount>,
    lookup_failed: bool,
    batch: Vec<DiscountCodeRecord>,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Configure,
            config: GenerationConfig::new(10, 13, ""),
            fields: SharedCodeFields::default(),
            candidates: Vec::new(),
            lookup_failed: false,
            batch: Vec::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GenerationConfig) {
        self.config = config;
    }

    pub fn fields(&self) -> &SharedCodeFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut SharedCodeFields {
        &mut self.fields
    }

    /// The generated batch, empty before the preview step is reached.
    pub fn batch(&self) -> &[DiscountCodeRecord] {
        &self.batch
    }

    /// Cart discounts fetched for linking.
    pub fn candidates(&self) -> &[CartDiscount] {
        &self.candidates
    }

    /// Whether the last candidate lookup failed; manual entry stays
    /// available either way.
    pub fn lookup_failed(&self) -> bool {
        self.lookup_failed
    }

    /// Leaves the configure step. Out-of-range input blocks the transition
    /// silently: the step does not advance and nothing is generated.
    pub fn continue_from_configure(&mut self) -> WizardStep {
        if self.step != WizardStep::Configure {
            return self.step;
        }
        if let Err(error) = self.config.validate() {
            debug!("Staying on configure step: {}", error);
            return self.step;
        }
        self.step = WizardStep::Fields;
        self.step
    }

    /// Leaves the fields step; there is no gate here.
    pub fn continue_from_fields(&mut self) -> WizardStep {
        if self.step == WizardStep::Fields {
            self.step = WizardStep::CartDiscounts;
        }
        self.step
    }

    /// Fetches the cart discounts eligible for linking. A failed lookup is
    /// not fatal: it is recorded so the caller can fall back to manual
    /// entry.
    pub fn load_cart_discounts(&mut self, service: &dyn DiscountCodeService) {
        match service.fetch_cart_discounts() {
            Ok(candidates) => {
                self.lookup_failed = false;
                self.candidates = candidates;
            }
            Err(error) => {
                warn!(
                    "Could not load cart discounts, manual entry stays available: {}",
                    error
                );
                self.lookup_failed = true;
                self.candidates.clear();
            }
        }
    }

    /// Links a cart discount, fetched or manually entered.
    pub fn select_cart_discount(&mut self, id: &str) {
        if !self.fields.cart_discounts.iter().any(|selected| selected == id) {
            self.fields.cart_discounts.push(id.to_string());
        }
    }

    pub fn deselect_cart_discount(&mut self, id: &str) {
        self.fields.cart_discounts.retain(|selected| selected != id);
    }

    /// Leaves the cart-discounts step and finalizes the batch. At least one
    /// linked cart discount is required; without one the step does not
    /// advance.
    pub fn continue_from_cart_discounts(&mut self) -> WizardStep {
        if self.step != WizardStep::CartDiscounts {
            return self.step;
        }
        if self.fields.cart_discounts.is_empty() {
            debug!("Staying on cart-discounts step: no cart discount linked");
            return self.step;
        }
        self.batch = generate_batch(&self.config, &self.fields);
        self.step = WizardStep::Preview;
        self.step
    }

    /// Goes one step back. Preview is the furthest step that can go back;
    /// a started import cannot.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Fields => WizardStep::Configure,
            WizardStep::CartDiscounts => WizardStep::Fields,
            WizardStep::Preview => WizardStep::CartDiscounts,
            other => other,
        };
        self.step
    }

    /// Writes the previewed batch to `path`.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), BatchError> {
        export::export(&self.batch, path)
    }

    /// Submits the previewed batch and returns the terminal progress.
    /// Import is only reachable from preview.
    pub fn import(&mut self, service: &dyn DiscountCodeService) -> Option<ImportProgress> {
        self.import_with_listener(service, &NoopProgressListener)
    }

    /// Like [`Wizard::import`], reporting a snapshot after every record.
    pub fn import_with_listener(
        &mut self,
        service: &dyn DiscountCodeService,
        listener: &dyn ProgressListener,
    ) -> Option<ImportProgress> {
        if self.step != WizardStep::Preview {
            return None;
        }
        self.step = WizardStep::Import;
        let importer = BatchImporter::with_listener(service, listener);
        Some(importer.import(&self.batch))
    }

    /// Restarts the flow and discards the generated batch.
    pub fn generate_more(&mut self) -> WizardStep {
        self.batch.clear();
        self.step = WizardStep::Configure;
        self.step
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}
