//! Normalization from wire shapes to [`storefront_core::Product`].
//!
//! Every product that leaves this module has passed
//! [`Product::validate`], so downstream code may rely on each variant
//! carrying exactly one value per declared option.

use std::str::FromStr;

use rust_decimal::Decimal;
use storefront_core::{
    Handle, Money, PriceRange, Product, ProductImage, ProductOption, ProductVariant,
    SelectedOption,
};

use crate::error::CatalogError;
use crate::types::{WireImage, WireMoney, WireProduct, WireVariant};

/// Normalizes a raw [`WireProduct`] into a validated [`Product`].
///
/// # Errors
///
/// Returns [`CatalogError::Normalization`] if the handle is not URL-safe, a
/// money amount is not a decimal, or the option/variant matrix is malformed.
pub fn normalize_product(product: WireProduct) -> Result<Product, CatalogError> {
    let raw_handle = product.handle;
    let fail = |reason: String| CatalogError::Normalization {
        handle: raw_handle.clone(),
        reason,
    };

    let handle = Handle::parse(&raw_handle).map_err(|e| fail(e.to_string()))?;

    let options = product
        .options
        .into_iter()
        .map(|opt| ProductOption {
            name: opt.name,
            values: opt.values,
        })
        .collect();

    let variants = product
        .variants
        .nodes
        .into_iter()
        .map(normalize_variant)
        .collect::<Result<Vec<_>, String>>()
        .map_err(&fail)?;

    let price_range = PriceRange {
        min_variant_price: normalize_money(product.price_range.min_variant_price)
            .map_err(&fail)?,
        max_variant_price: normalize_money(product.price_range.max_variant_price)
            .map_err(&fail)?,
    };

    let normalized = Product {
        id: product.id,
        handle,
        title: product.title,
        // Treat a null description as empty; the quick view never
        // distinguishes the two.
        description: product.description.unwrap_or_default(),
        featured_image: product.featured_image.map(normalize_image),
        images: product.images.nodes.into_iter().map(normalize_image).collect(),
        options,
        variants,
        price_range,
    };

    normalized.validate().map_err(|e| fail(e.to_string()))?;
    Ok(normalized)
}

fn normalize_variant(variant: WireVariant) -> Result<ProductVariant, String> {
    let price = normalize_money(variant.price)
        .map_err(|reason| format!("variant {}: {reason}", variant.id))?;
    let compare_at_price = variant
        .compare_at_price
        .map(normalize_money)
        .transpose()
        .map_err(|reason| format!("variant {}: {reason}", variant.id))?;

    Ok(ProductVariant {
        id: variant.id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|opt| SelectedOption {
                name: opt.name,
                value: opt.value,
            })
            .collect(),
        price,
        compare_at_price,
        image: variant.image.map(normalize_image),
    })
}

fn normalize_money(money: WireMoney) -> Result<Money, String> {
    let amount = Decimal::from_str(money.amount.trim())
        .map_err(|e| format!("amount \"{}\" is not a decimal: {e}", money.amount))?;
    Ok(Money {
        amount,
        currency_code: money.currency_code,
    })
}

fn normalize_image(image: WireImage) -> ProductImage {
    ProductImage {
        url: image.url,
        // Empty alt text is as good as none.
        alt_text: image.alt_text.filter(|s| !s.is_empty()),
        width: image.width,
        height: image.height,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
