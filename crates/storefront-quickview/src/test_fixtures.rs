//! Product builders shared by the unit tests in this crate.

use storefront_core::{
    Handle, Money, PriceRange, Product, ProductImage, ProductOption, ProductVariant,
    SelectedOption, Selection,
};

pub(crate) fn usd(amount: &str) -> Money {
    Money {
        amount: amount.parse().expect("valid decimal"),
        currency_code: "USD".to_string(),
    }
}

pub(crate) fn selection(pairs: &[(&str, &str)]) -> Selection {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

pub(crate) fn option(name: &str, values: &[&str]) -> ProductOption {
    ProductOption {
        name: name.to_string(),
        values: values.iter().map(|v| (*v).to_string()).collect(),
    }
}

pub(crate) fn variant(id: &str, pairs: &[(&str, &str)], available: bool) -> ProductVariant {
    ProductVariant {
        id: id.to_string(),
        title: pairs.iter().map(|(_, v)| *v).collect::<Vec<_>>().join(" / "),
        available_for_sale: available,
        selected_options: pairs
            .iter()
            .map(|(name, value)| SelectedOption {
                name: (*name).to_string(),
                value: (*value).to_string(),
            })
            .collect(),
        price: usd("25.00"),
        compare_at_price: None,
        image: None,
    }
}

pub(crate) fn image(url: &str) -> ProductImage {
    ProductImage {
        url: url.to_string(),
        alt_text: None,
        width: None,
        height: None,
    }
}

pub(crate) fn product(
    id: &str,
    handle: &str,
    options: Vec<ProductOption>,
    variants: Vec<ProductVariant>,
) -> Product {
    Product {
        id: id.to_string(),
        handle: Handle::parse(handle).expect("valid handle"),
        title: handle.replace('-', " "),
        description: String::new(),
        featured_image: None,
        images: vec![],
        options,
        variants,
        price_range: PriceRange {
            min_variant_price: usd("20.00"),
            max_variant_price: usd("25.00"),
        },
    }
}

/// `Size:[S,M] x Color:[Black,White]` where only S/Black and M/White sell.
pub(crate) fn size_color_product() -> Product {
    product(
        "gid://shopify/Product/1",
        "classic-tee",
        vec![option("Size", &["S", "M"]), option("Color", &["Black", "White"])],
        vec![
            variant("s-black", &[("Size", "S"), ("Color", "Black")], true),
            variant("s-white", &[("Size", "S"), ("Color", "White")], false),
            variant("m-black", &[("Size", "M"), ("Color", "Black")], false),
            variant("m-white", &[("Size", "M"), ("Color", "White")], true),
        ],
    )
}

/// A single `Title: Default Title` variant.
pub(crate) fn plain_product(available: bool) -> Product {
    product(
        "gid://shopify/Product/2",
        "canvas-tote",
        vec![option("Title", &["Default Title"])],
        vec![variant(
            "tote",
            &[("Title", "Default Title")],
            available,
        )],
    )
}
