//! Variant selection state for the currently loaded product.
//!
//! The effective selection is two layers: a default computed from the
//! product, overlaid by the shopper's explicit choices. Both are rebuilt
//! whenever the product identity changes, so choices never leak from one
//! product to the next.

use std::sync::Arc;

use serde::Serialize;
use storefront_core::{Product, ProductVariant, Selection};

use crate::resolver::{
    available_values_by_option, first_available_variant, is_option_value_available,
    resolve_variant, selection_from_variant, AvailableValues,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    NoProduct,
    DefaultSelection,
    UserAdjusted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Applied,
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Nothing is loaded.
    NoProduct,
    /// The write was aimed at a product that has since been replaced.
    SupersededProduct,
    /// The product declares no option with that name.
    UnknownOption,
}

/// Why adding to the bag is currently not possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddDisabledReason {
    NoProduct,
    /// The product has real options and the selection does not resolve.
    SelectionIncomplete,
    /// The resolved variant, or the product's only line, cannot be sold.
    VariantUnavailable,
}

#[derive(Debug, Default)]
pub struct VariantSelection {
    product: Option<Arc<Product>>,
    defaults: Selection,
    choices: Selection,
}

impl VariantSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the product whose variants are being chosen.
    ///
    /// Returns `true` if the product identity changed, in which case the
    /// shopper's choices are dropped and the default layer is recomputed.
    /// Passing the same product again keeps the current choices.
    pub fn set_product(&mut self, product: Option<Arc<Product>>) -> bool {
        let same = match (&self.product, &product) {
            (Some(current), Some(next)) => current.id == next.id && current.handle == next.handle,
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }

        self.choices.clear();
        self.defaults = product.as_deref().map(default_selection).unwrap_or_default();
        tracing::debug!(
            product_id = product.as_ref().map(|p| p.id.as_str()),
            default_entries = self.defaults.len(),
            "variant selection reset"
        );
        self.product = product;
        true
    }

    #[must_use]
    pub fn product(&self) -> Option<&Arc<Product>> {
        self.product.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        match (&self.product, self.choices.is_empty()) {
            (None, _) => SelectionPhase::NoProduct,
            (Some(_), true) => SelectionPhase::DefaultSelection,
            (Some(_), false) => SelectionPhase::UserAdjusted,
        }
    }

    /// The effective selection: defaults overlaid by explicit choices.
    #[must_use]
    pub fn selection(&self) -> Selection {
        let mut merged = self.defaults.clone();
        merged.extend(
            self.choices
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        merged
    }

    /// Records `option_name = value` for the product identified by
    /// `product_id`.
    ///
    /// Availability is not checked here; a contradictory choice simply fails
    /// to resolve or resolves to an unsellable variant.
    pub fn select_option(
        &mut self,
        product_id: &str,
        option_name: &str,
        value: &str,
    ) -> SelectOutcome {
        let Some(product) = &self.product else {
            return SelectOutcome::Discarded(DiscardReason::NoProduct);
        };
        if product.id != product_id {
            tracing::debug!(
                target_product = product_id,
                current_product = %product.id,
                "discarding selection aimed at a superseded product"
            );
            return SelectOutcome::Discarded(DiscardReason::SupersededProduct);
        }
        if !product.options.iter().any(|opt| opt.name == option_name) {
            return SelectOutcome::Discarded(DiscardReason::UnknownOption);
        }

        self.choices.insert(option_name.to_owned(), value.to_owned());
        SelectOutcome::Applied
    }

    #[must_use]
    pub fn resolved_variant(&self) -> Option<&ProductVariant> {
        let product = self.product.as_deref()?;
        resolve_variant(&product.variants, &self.selection())
    }

    #[must_use]
    pub fn available_values(&self) -> AvailableValues {
        self.product
            .as_deref()
            .map(|p| available_values_by_option(&p.variants, &p.options, &self.selection()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_option_disabled(&self, option_name: &str, value: &str) -> bool {
        self.product.as_deref().is_none_or(|p| {
            !is_option_value_available(&p.variants, &self.selection(), option_name, value)
        })
    }

    #[must_use]
    pub fn is_selected(&self, option_name: &str, value: &str) -> bool {
        self.choices
            .get(option_name)
            .or_else(|| self.defaults.get(option_name))
            .is_some_and(|chosen| chosen == value)
    }

    #[must_use]
    pub fn add_disabled_reason(&self) -> Option<AddDisabledReason> {
        let Some(product) = self.product.as_deref() else {
            return Some(AddDisabledReason::NoProduct);
        };
        match self.resolved_variant() {
            Some(variant) if variant.available_for_sale => None,
            Some(_) => Some(AddDisabledReason::VariantUnavailable),
            None if product.has_real_options() => Some(AddDisabledReason::SelectionIncomplete),
            None => Some(AddDisabledReason::VariantUnavailable),
        }
    }

    #[must_use]
    pub fn is_add_disabled(&self) -> bool {
        self.add_disabled_reason().is_some()
    }
}

/// Computes the default layer for `product`.
///
/// Without real options the first sellable variant is selected outright, or
/// nothing when no variant sells. With real options the shopper must choose
/// every visible option; only hidden single-value options are pre-filled.
fn default_selection(product: &Product) -> Selection {
    if !product.has_real_options() {
        return selection_from_variant(first_available_variant(&product.variants));
    }

    product
        .options
        .iter()
        .filter_map(|opt| match opt.values.as_slice() {
            [only] => Some((opt.name.clone(), only.clone())),
            _ => None,
        })
        .collect()
}
