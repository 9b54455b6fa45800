//! Render-ready snapshot of the quick view.

use serde::Serialize;
use storefront_core::{Handle, Money, Product, ProductImage, ProductVariant, Selection};

use crate::loader::{LoadError, LoadState, LoadStatus};
use crate::resolver::AvailableValues;
use crate::selection::{AddDisabledReason, SelectionPhase, VariantSelection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValueView {
    pub value: String,
    pub selected: bool,
    /// No sellable variant carries this value given the other choices.
    pub disabled: bool,
}

/// A selectable option, in declaration order. Degenerate options are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// The line handed to the bag when the shopper adds the resolved variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub variant_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickViewModel {
    pub is_open: bool,
    pub handle: Option<Handle>,
    pub is_loading: bool,
    pub is_error: bool,
    pub is_not_found: bool,
    pub error: Option<LoadError>,
    pub product: Option<Product>,
    pub selection: Selection,
    pub selection_phase: SelectionPhase,
    pub options: Vec<OptionView>,
    pub resolved_variant: Option<ProductVariant>,
    pub available_values_by_option: AvailableValues,
    /// The resolved variant's price, else the lowest price in the range.
    pub price: Option<Money>,
    /// Present only when strictly above `price`.
    pub compare_at_price: Option<Money>,
    pub image: Option<ProductImage>,
    /// Loaded, but no variant can be sold.
    pub is_sold_out: bool,
    pub is_add_disabled: bool,
    pub add_disabled_reason: Option<AddDisabledReason>,
}

impl QuickViewModel {
    pub(crate) fn build(
        is_open: bool,
        handle: Option<&Handle>,
        load: &LoadState,
        selection: &VariantSelection,
    ) -> Self {
        let product: Option<&Product> = selection.product().map(AsRef::as_ref);
        let resolved = selection.resolved_variant();

        let options = product
            .map(|p| {
                p.selectable_options()
                    .map(|opt| OptionView {
                        name: opt.name.clone(),
                        values: opt
                            .values
                            .iter()
                            .map(|value| OptionValueView {
                                value: value.clone(),
                                selected: selection.is_selected(&opt.name, value),
                                disabled: selection.is_option_disabled(&opt.name, value),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let price = resolved
            .map(|v| v.price.clone())
            .or_else(|| product.map(|p| p.price_range.min_variant_price.clone()));
        let compare_at_price = resolved
            .and_then(|v| v.compare_at_price.as_ref())
            .filter(|compare_at| price.as_ref().is_some_and(|p| compare_at.exceeds(p)))
            .cloned();
        let image = resolved
            .and_then(|v| v.image.as_ref())
            .or_else(|| product.and_then(Product::primary_image))
            .cloned();

        let add_disabled_reason = selection.add_disabled_reason();

        Self {
            is_open,
            handle: handle.cloned(),
            is_loading: load.status == LoadStatus::Loading,
            is_error: load.status == LoadStatus::Error,
            is_not_found: load.is_not_found(),
            error: load.error.clone(),
            product: product.cloned(),
            selection: selection.selection(),
            selection_phase: selection.phase(),
            options,
            resolved_variant: resolved.cloned(),
            available_values_by_option: selection.available_values(),
            price,
            compare_at_price,
            image,
            is_sold_out: product.is_some_and(|p| !p.has_available_variants()),
            is_add_disabled: add_disabled_reason.is_some(),
            add_disabled_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_fixtures::{image, size_color_product, usd};

    fn ready(product: &Product) -> LoadState {
        LoadState {
            status: LoadStatus::Ready,
            handle: Some(product.handle.clone()),
            product: Some(Arc::new(product.clone())),
            error: None,
        }
    }

    fn on_sale_tee() -> Product {
        let mut product = size_color_product();
        product.featured_image = Some(image("https://cdn.example/tee.jpg"));
        let m_white = &mut product.variants[3];
        m_white.price = usd("20.00");
        m_white.compare_at_price = Some(usd("30.00"));
        m_white.image = Some(image("https://cdn.example/tee-white.jpg"));
        // Compare-at equal to price is not a sale.
        product.variants[0].compare_at_price = Some(usd("25.00"));
        product
    }

    fn build(selection: &VariantSelection, product: &Product) -> QuickViewModel {
        QuickViewModel::build(true, Some(&product.handle), &ready(product), selection)
    }

    #[test]
    fn unresolved_selection_falls_back_to_product_level_display() {
        let product = on_sale_tee();
        let mut selection = VariantSelection::new();
        selection.set_product(Some(Arc::new(product.clone())));

        let view = build(&selection, &product);
        assert_eq!(view.price, Some(usd("20.00")));
        assert_eq!(view.compare_at_price, None);
        assert_eq!(
            view.image.map(|i| i.url).as_deref(),
            Some("https://cdn.example/tee.jpg")
        );
        assert_eq!(
            view.add_disabled_reason,
            Some(AddDisabledReason::SelectionIncomplete)
        );
    }

    #[test]
    fn resolved_variant_drives_price_and_image() {
        let product = on_sale_tee();
        let mut selection = VariantSelection::new();
        selection.set_product(Some(Arc::new(product.clone())));
        selection.select_option(&product.id, "Size", "M");
        selection.select_option(&product.id, "Color", "White");

        let view = build(&selection, &product);
        assert_eq!(view.price, Some(usd("20.00")));
        assert_eq!(view.compare_at_price, Some(usd("30.00")));
        assert_eq!(
            view.image.map(|i| i.url).as_deref(),
            Some("https://cdn.example/tee-white.jpg")
        );
        assert!(!view.is_add_disabled);
    }

    #[test]
    fn equal_compare_at_price_is_hidden() {
        let product = on_sale_tee();
        let mut selection = VariantSelection::new();
        selection.set_product(Some(Arc::new(product.clone())));
        selection.select_option(&product.id, "Size", "S");
        selection.select_option(&product.id, "Color", "Black");

        let view = build(&selection, &product);
        assert_eq!(view.price, Some(usd("25.00")));
        assert_eq!(view.compare_at_price, None);
    }

    #[test]
    fn option_views_flag_selected_and_disabled_values() {
        let product = size_color_product();
        let mut selection = VariantSelection::new();
        selection.set_product(Some(Arc::new(product.clone())));
        selection.select_option(&product.id, "Size", "S");

        let view = build(&selection, &product);
        let color = view
            .options
            .iter()
            .find(|opt| opt.name == "Color")
            .expect("color option");
        let flags: Vec<(&str, bool, bool)> = color
            .values
            .iter()
            .map(|v| (v.value.as_str(), v.selected, v.disabled))
            .collect();
        assert_eq!(flags, vec![("Black", false, false), ("White", false, true)]);

        let size = &view.options[0];
        assert!(size.values[0].selected);
    }

    #[test]
    fn closed_view_serializes_empty_state() {
        let view =
            QuickViewModel::build(false, None, &LoadState::default(), &VariantSelection::new());
        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["is_open"], false);
        assert_eq!(json["selection_phase"], "no_product");
        assert_eq!(json["add_disabled_reason"], "no_product");
        assert!(json["product"].is_null());
        assert_eq!(json["is_sold_out"], false);
        assert_eq!(json["options"], serde_json::json!([]));
    }
}
