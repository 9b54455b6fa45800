//! Shared helpers for the quick-view integration tests: a product source
//! whose responses the test releases by hand, and catalog fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use storefront_catalog::{CatalogError, ProductSource};
use storefront_core::{
    Handle, Money, PriceRange, Product, ProductImage, ProductOption, ProductVariant,
    SelectedOption,
};
use tokio::sync::oneshot;

pub type FetchOutcome = Result<Option<Product>, CatalogError>;

/// A [`ProductSource`] that parks every fetch until the test answers it.
#[derive(Default)]
pub struct ScriptedSource {
    pending: Mutex<Vec<(String, oneshot::Sender<FetchOutcome>)>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Waits until a fetch for `handle` is parked and takes its responder.
    pub async fn next_fetch(&self, handle: &str) -> oneshot::Sender<FetchOutcome> {
        let wait = async {
            loop {
                let taken = {
                    let mut pending = self.pending.lock().expect("pending lock");
                    pending
                        .iter()
                        .position(|(h, _)| h == handle)
                        .map(|idx| pending.remove(idx).1)
                };
                if let Some(tx) = taken {
                    return tx;
                }
                tokio::task::yield_now().await;
            }
        };
        tokio::time::timeout(Duration::from_secs(2), wait)
            .await
            .unwrap_or_else(|_| panic!("no fetch issued for {handle}"))
    }

    /// Answers the parked fetch for `handle`.
    pub async fn respond(&self, handle: &str, outcome: FetchOutcome) {
        let tx = self.next_fetch(handle).await;
        assert!(tx.send(outcome).is_ok(), "fetch for {handle} was cancelled");
    }
}

impl ProductSource for ScriptedSource {
    async fn fetch_product(&self, handle: &Handle) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending lock")
            .push((handle.to_string(), tx));
        rx.await.unwrap_or_else(|_| Err(server_error("responder dropped")))
    }
}

/// Returns `true` once the fetch behind `tx` has been abandoned.
pub async fn is_abandoned(tx: &mut oneshot::Sender<FetchOutcome>) -> bool {
    tokio::time::timeout(Duration::from_secs(1), tx.closed())
        .await
        .is_ok()
}

pub fn server_error(url: &str) -> CatalogError {
    CatalogError::UnexpectedStatus {
        status: 503,
        url: url.to_string(),
    }
}

pub fn usd(amount: &str) -> Money {
    Money {
        amount: amount.parse().expect("valid decimal"),
        currency_code: "USD".to_string(),
    }
}

fn option(name: &str, values: &[&str]) -> ProductOption {
    ProductOption {
        name: name.to_string(),
        values: values.iter().map(|v| (*v).to_string()).collect(),
    }
}

fn variant(id: &str, pairs: &[(&str, &str)], available: bool) -> ProductVariant {
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
        price: usd("28.00"),
        compare_at_price: None,
        image: None,
    }
}

fn product(
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
        featured_image: Some(ProductImage {
            url: format!("https://cdn.example/{handle}.jpg"),
            alt_text: None,
            width: Some(800),
            height: Some(800),
        }),
        images: vec![],
        options,
        variants,
        price_range: PriceRange {
            min_variant_price: usd("28.00"),
            max_variant_price: usd("28.00"),
        },
    }
}

/// `Size:[S,M] x Color:[Black,White]`; only S/Black and M/White sell.
pub fn tee() -> Product {
    product(
        "gid://shopify/Product/100",
        "classic-tee",
        vec![
            option("Size", &["S", "M"]),
            option("Color", &["Black", "White"]),
        ],
        vec![
            variant("gid://shopify/ProductVariant/101", &[("Size", "S"), ("Color", "Black")], true),
            variant("gid://shopify/ProductVariant/102", &[("Size", "S"), ("Color", "White")], false),
            variant("gid://shopify/ProductVariant/103", &[("Size", "M"), ("Color", "Black")], false),
            variant("gid://shopify/ProductVariant/104", &[("Size", "M"), ("Color", "White")], true),
        ],
    )
}

/// One `Title: Default Title` variant.
pub fn tote(available: bool) -> Product {
    product(
        "gid://shopify/Product/200",
        "canvas-tote",
        vec![option("Title", &["Default Title"])],
        vec![variant(
            "gid://shopify/ProductVariant/201",
            &[("Title", "Default Title")],
            available,
        )],
    )
}
