//! Pure functions over a product's variant matrix.
//!
//! Nothing here holds state; callers pass the current variants and
//! selection on every call.

use std::collections::{BTreeMap, BTreeSet};

use storefront_core::{ProductOption, ProductVariant, Selection};

/// Option name → values that still lead to at least one sellable variant.
pub type AvailableValues = BTreeMap<String, BTreeSet<String>>;

/// Returns the unique variant whose option mapping equals `selection`.
///
/// Every option the variant declares must be present in `selection` with the
/// same value; selection entries for options the variant does not declare are
/// ignored. A partial selection never resolves, and neither does one that
/// matches more than one variant.
#[must_use]
pub fn resolve_variant<'a>(
    variants: &'a [ProductVariant],
    selection: &Selection,
) -> Option<&'a ProductVariant> {
    let mut matching = variants.iter().filter(|variant| {
        variant
            .selected_options
            .iter()
            .all(|opt| selection.get(&opt.name) == Some(&opt.value))
    });

    let first = matching.next()?;
    if matching.next().is_some() {
        return None;
    }
    Some(first)
}

/// Returns `true` if some sellable variant carries `option_name = option_value`
/// and agrees with every other entry already in `selection`.
///
/// Options not yet chosen are ignored, so a value stays available as long as
/// one sellable completion exists.
#[must_use]
pub fn is_option_value_available(
    variants: &[ProductVariant],
    selection: &Selection,
    option_name: &str,
    option_value: &str,
) -> bool {
    variants
        .iter()
        .filter(|variant| variant.available_for_sale)
        .any(|variant| {
            variant.option_value(option_name) == Some(option_value)
                && selection
                    .iter()
                    .filter(|(name, _)| name.as_str() != option_name)
                    .all(|(name, value)| variant.option_value(name) == Some(value.as_str()))
        })
}

/// Collects, per option, the values carried by sellable variants consistent
/// with `selection`.
///
/// A variant is consistent when every selection entry either names an option
/// the variant lacks or matches the variant's value. Every declared option is
/// present in the result, possibly with an empty set.
#[must_use]
pub fn available_values_by_option(
    variants: &[ProductVariant],
    options: &[ProductOption],
    selection: &Selection,
) -> AvailableValues {
    let mut available: AvailableValues = options
        .iter()
        .map(|opt| (opt.name.clone(), BTreeSet::new()))
        .collect();

    let consistent = variants
        .iter()
        .filter(|variant| variant.available_for_sale)
        .filter(|variant| {
            selection.iter().all(|(name, value)| {
                variant
                    .option_value(name)
                    .is_none_or(|carried| carried == value)
            })
        });

    for variant in consistent {
        for opt in &variant.selected_options {
            available
                .entry(opt.name.clone())
                .or_default()
                .insert(opt.value.clone());
        }
    }

    available
}

/// First variant in declaration order that is available for sale.
#[must_use]
pub fn first_available_variant(variants: &[ProductVariant]) -> Option<&ProductVariant> {
    variants.iter().find(|variant| variant.available_for_sale)
}

/// Projects a variant's option mapping into a [`Selection`]. `None` yields an
/// empty selection.
#[must_use]
pub fn selection_from_variant(variant: Option<&ProductVariant>) -> Selection {
    variant
        .map(|v| {
            v.selected_options
                .iter()
                .map(|opt| (opt.name.clone(), opt.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
