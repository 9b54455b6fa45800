use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CoreError, Handle};

/// A shopper's in-progress option choices, keyed by option name
/// (e.g. `{"Size": "M", "Color": "Black"}`).
pub type Selection = BTreeMap<String, String>;

/// Name Shopify gives the synthetic option of a product without real variants.
pub const DEGENERATE_OPTION_NAME: &str = "Title";

/// A decimal amount in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Serialized as a decimal string, e.g. `"29.00"`.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., `"USD"`).
    pub currency_code: String,
}

impl Money {
    /// Returns `true` if `self` is strictly greater than `other` in the same
    /// currency. Amounts in different currencies are never comparable.
    #[must_use]
    pub fn exceeds(&self, other: &Money) -> bool {
        self.currency_code == other.currency_code && self.amount > other.amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A named axis of variation with its ordered candidate values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

impl ProductOption {
    /// Returns `true` if this option offers fewer than two values, like the
    /// synthetic `Title: [Default Title]` of a product without variants.
    ///
    /// Degenerate options are hidden from selection UI and do not count as
    /// real variants.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.values.len() < 2
    }

    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// One concrete purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    /// Display title, e.g. `"M / Black"` or `"Default Title"`.
    pub title: String,
    pub available_for_sale: bool,
    /// Exactly one entry per option the product declares.
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
    /// Strike-through price, when the variant is on sale.
    pub compare_at_price: Option<Money>,
    pub image: Option<ProductImage>,
}

impl ProductVariant {
    /// Returns the value this variant carries for `option_name`, if any.
    #[must_use]
    pub fn option_value(&self, option_name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|opt| opt.name == option_name)
            .map(|opt| opt.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

/// Full product detail as shown in the quick view.
///
/// Variants are immutable for the lifetime of a loaded product. Call
/// [`Product::validate`] after constructing one from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog GID, e.g. `"gid://shopify/Product/123"`.
    pub id: String,
    pub handle: Handle,
    pub title: String,
    pub description: String,
    pub featured_image: Option<ProductImage>,
    pub images: Vec<ProductImage>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
    /// Fallback price when no variant is resolved.
    pub price_range: PriceRange,
}

impl Product {
    /// Options a shopper actually chooses between, in declaration order.
    pub fn selectable_options(&self) -> impl Iterator<Item = &ProductOption> {
        self.options.iter().filter(|opt| !opt.is_degenerate())
    }

    /// Returns `true` if at least one option is not degenerate.
    #[must_use]
    pub fn has_real_options(&self) -> bool {
        self.selectable_options().next().is_some()
    }

    /// The image to show when no variant image applies: the featured image,
    /// else the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.featured_image.as_ref().or_else(|| self.images.first())
    }

    /// Returns `true` if at least one variant is currently available for purchase.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }

    /// Checks the structural invariants of the option/variant matrix.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DuplicateOptionValue`] if an option lists a value twice.
    /// - [`CoreError::UndeclaredOption`] / [`CoreError::RepeatedOption`] /
    ///   [`CoreError::MissingOptionValue`] if a variant does not carry exactly
    ///   one value per declared option.
    /// - [`CoreError::UnknownOptionValue`] if a variant carries a value its
    ///   option does not declare.
    pub fn validate(&self) -> Result<(), CoreError> {
        for option in &self.options {
            let mut seen = HashSet::new();
            for value in &option.values {
                if !seen.insert(value.as_str()) {
                    return Err(CoreError::DuplicateOptionValue {
                        product_id: self.id.clone(),
                        option: option.name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        for variant in &self.variants {
            let mut carried = HashSet::new();
            for selected in &variant.selected_options {
                let Some(option) = self.options.iter().find(|o| o.name == selected.name) else {
                    return Err(CoreError::UndeclaredOption {
                        variant_id: variant.id.clone(),
                        option: selected.name.clone(),
                    });
                };
                if !carried.insert(selected.name.as_str()) {
                    return Err(CoreError::RepeatedOption {
                        variant_id: variant.id.clone(),
                        option: selected.name.clone(),
                    });
                }
                if !option.has_value(&selected.value) {
                    return Err(CoreError::UnknownOptionValue {
                        variant_id: variant.id.clone(),
                        option: selected.name.clone(),
                        value: selected.value.clone(),
                    });
                }
            }

            if let Some(missing) = self
                .options
                .iter()
                .find(|o| !carried.contains(o.name.as_str()))
            {
                return Err(CoreError::MissingOptionValue {
                    variant_id: variant.id.clone(),
                    option: missing.name.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Money {
        Money {
            amount: amount.parse().expect("valid decimal"),
            currency_code: "USD".to_string(),
        }
    }

    fn make_variant(id: &str, pairs: &[(&str, &str)], available: bool) -> ProductVariant {
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

    fn make_product(options: Vec<ProductOption>, variants: Vec<ProductVariant>) -> Product {
        Product {
            id: "gid://shopify/Product/1".to_string(),
            handle: Handle::parse("classic-tee").unwrap(),
            title: "Classic Tee".to_string(),
            description: "Heavyweight cotton.".to_string(),
            featured_image: None,
            images: vec![],
            options,
            variants,
            price_range: PriceRange {
                min_variant_price: usd("25.00"),
                max_variant_price: usd("25.00"),
            },
        }
    }

    fn option(name: &str, values: &[&str]) -> ProductOption {
        ProductOption {
            name: name.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    #[test]
    fn title_option_is_degenerate_only_with_a_single_value() {
        assert!(option(DEGENERATE_OPTION_NAME, &["Default Title"]).is_degenerate());
        assert!(!option("Title", &["A", "B"]).is_degenerate());
    }

    #[test]
    fn single_value_option_is_degenerate() {
        assert!(option("Material", &["Cotton"]).is_degenerate());
        assert!(!option("Size", &["S", "M"]).is_degenerate());
    }

    #[test]
    fn has_real_options_ignores_degenerate() {
        let plain = make_product(
            vec![option("Title", &["Default Title"])],
            vec![make_variant("1", &[("Title", "Default Title")], true)],
        );
        assert!(!plain.has_real_options());

        let sized = make_product(
            vec![option("Title", &["Default Title"]), option("Size", &["S", "M"])],
            vec![],
        );
        assert!(sized.has_real_options());
        let names: Vec<_> = sized.selectable_options().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Size"]);
    }

    #[test]
    fn option_value_looks_up_by_name() {
        let v = make_variant("1", &[("Size", "S"), ("Color", "Black")], true);
        assert_eq!(v.option_value("Color"), Some("Black"));
        assert_eq!(v.option_value("Fit"), None);
    }

    #[test]
    fn money_exceeds_requires_same_currency() {
        assert!(usd("30.00").exceeds(&usd("25.00")));
        assert!(!usd("25.00").exceeds(&usd("25.00")));
        let eur = Money {
            amount: "99.00".parse().unwrap(),
            currency_code: "EUR".to_string(),
        };
        assert!(!eur.exceeds(&usd("25.00")));
    }

    #[test]
    fn primary_image_falls_back_to_gallery() {
        let mut product = make_product(vec![], vec![]);
        assert!(product.primary_image().is_none());
        product.images.push(ProductImage {
            url: "https://cdn.example.com/a.jpg".to_string(),
            alt_text: None,
            width: None,
            height: None,
        });
        assert_eq!(
            product.primary_image().map(|i| i.url.as_str()),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn validate_accepts_complete_matrix() {
        let product = make_product(
            vec![option("Size", &["S", "M"]), option("Color", &["Black", "White"])],
            vec![
                make_variant("1", &[("Size", "S"), ("Color", "Black")], true),
                make_variant("2", &[("Size", "M"), ("Color", "White")], false),
            ],
        );
        assert!(product.validate().is_ok());
        assert!(product.has_available_variants());
    }

    #[test]
    fn validate_rejects_missing_option_value() {
        let product = make_product(
            vec![option("Size", &["S", "M"]), option("Color", &["Black"])],
            vec![make_variant("1", &[("Size", "S")], true)],
        );
        let err = product.validate().unwrap_err();
        assert!(
            matches!(err, CoreError::MissingOptionValue { ref option, .. } if option == "Color"),
            "expected MissingOptionValue(Color), got: {err:?}"
        );
    }

    #[test]
    fn validate_rejects_extra_option() {
        let product = make_product(
            vec![option("Size", &["S", "M"])],
            vec![make_variant("1", &[("Size", "S"), ("Fit", "Slim")], true)],
        );
        assert!(matches!(
            product.validate(),
            Err(CoreError::UndeclaredOption { .. })
        ));
    }

    #[test]
    fn validate_rejects_repeated_option() {
        let product = make_product(
            vec![option("Size", &["S", "M"])],
            vec![make_variant("1", &[("Size", "S"), ("Size", "M")], true)],
        );
        assert!(matches!(
            product.validate(),
            Err(CoreError::RepeatedOption { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_value() {
        let product = make_product(
            vec![option("Size", &["S", "M"])],
            vec![make_variant("1", &[("Size", "XL")], true)],
        );
        assert!(matches!(
            product.validate(),
            Err(CoreError::UnknownOptionValue { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_option_values() {
        let product = make_product(vec![option("Size", &["S", "S"])], vec![]);
        assert!(matches!(
            product.validate(),
            Err(CoreError::DuplicateOptionValue { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_keeps_decimal_amounts_as_strings() {
        let product = make_product(
            vec![option("Size", &["S", "M"])],
            vec![make_variant("1", &[("Size", "S")], true)],
        );
        let json = serde_json::to_value(&product).expect("serialization failed");
        assert_eq!(json["price_range"]["min_variant_price"]["amount"], "25.00");
        let decoded: Product = serde_json::from_value(json).expect("deserialization failed");
        assert_eq!(decoded, product);
    }
}
