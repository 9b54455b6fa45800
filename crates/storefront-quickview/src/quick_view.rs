//! The quick view as a whole: modal session, product loading and variant
//! selection driven together.

use std::sync::Arc;

use storefront_catalog::ProductSource;
use storefront_core::{AppConfig, Handle};

use crate::error::QuickViewError;
use crate::loader::{LoadState, LoadStatus, ProductLoader};
use crate::modal::{
    CloseReason, ElementId, Key, KeyOutcome, ModalManager, OpenOutcome, PageHost, PointerTarget,
};
use crate::selection::{SelectOutcome, VariantSelection};
use crate::view::{CartLine, QuickViewModel};

const DEFAULT_FOCUS_RETRY_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickViewConfig {
    pub focus_retry_attempts: u32,
}

impl Default for QuickViewConfig {
    fn default() -> Self {
        Self {
            focus_retry_attempts: DEFAULT_FOCUS_RETRY_ATTEMPTS,
        }
    }
}

impl From<&AppConfig> for QuickViewConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            focus_retry_attempts: config.focus_retry_attempts,
        }
    }
}

pub struct QuickView<S: ProductSource, H: PageHost> {
    loader: ProductLoader<S>,
    selection: VariantSelection,
    modal: ModalManager<H>,
}

impl<S: ProductSource, H: PageHost> QuickView<S, H> {
    pub fn new(source: Arc<S>, host: H, config: QuickViewConfig) -> Self {
        Self {
            loader: ProductLoader::new(source),
            selection: VariantSelection::new(),
            modal: ModalManager::new(host, config.focus_retry_attempts),
        }
    }

    /// Opens the quick view on `handle` and starts loading it.
    ///
    /// Re-opening on the handle already shown changes nothing. Opening on a
    /// different handle while open switches products: the previous fetch is
    /// superseded and the selection starts over.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`QuickViewError::InvalidHandle`] if `handle` is empty or not
    /// URL-safe. The modal is left as it was.
    pub fn open(
        &mut self,
        handle: &str,
        trigger: Option<ElementId>,
    ) -> Result<OpenOutcome, QuickViewError> {
        let handle = Handle::parse(handle)?;
        let outcome = self.modal.open(handle.clone(), trigger);
        if outcome != OpenOutcome::Unchanged {
            self.selection.set_product(None);
            self.loader.request(Some(handle));
        }
        Ok(outcome)
    }

    /// Closes the quick view, cancelling any in-flight fetch.
    ///
    /// Returns `false` if it was not open.
    pub fn close(&mut self) -> bool {
        let closed = self.modal.close(CloseReason::Explicit);
        if closed {
            self.teardown();
        }
        closed
    }

    /// Fetches the current handle again after a failure.
    ///
    /// Returns `false` unless the quick view is open and in the error state.
    pub fn retry(&mut self) -> bool {
        if self.loader.state().status != LoadStatus::Error {
            return false;
        }
        let Some(handle) = self.modal.active_handle().cloned() else {
            return false;
        };
        tracing::info!(%handle, "retrying product fetch");
        self.loader.request(Some(handle)).is_some()
    }

    /// Waits for the current fetch to settle and feeds the result to the
    /// selection. Returns `true` if the loaded state changed.
    pub async fn settle(&mut self) -> bool {
        let changed = self.loader.settle().await;
        if changed {
            self.sync_product();
        }
        changed
    }

    /// Like [`QuickView::settle`] but only applies results that already
    /// arrived.
    pub fn poll_settled(&mut self) -> bool {
        let changed = self.loader.poll_settled();
        if changed {
            self.sync_product();
        }
        changed
    }

    /// Tells the quick view its dialog content was re-rendered, so focus can
    /// move onto elements that were not there at open time.
    pub fn content_changed(&mut self) -> bool {
        self.modal.retry_initial_focus()
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.modal.handle_key(key);
        if matches!(outcome, KeyOutcome::Closed(_)) {
            self.teardown();
        }
        outcome
    }

    /// Returns `true` if the click closed the quick view.
    pub fn handle_pointer(&mut self, target: PointerTarget) -> bool {
        let closed = self.modal.handle_pointer(target);
        if closed {
            self.teardown();
        }
        closed
    }

    /// Records a choice for the product identified by `product_id`.
    ///
    /// Writes aimed at a product other than the one currently loaded are
    /// discarded.
    pub fn select_option(
        &mut self,
        product_id: &str,
        option_name: &str,
        value: &str,
    ) -> SelectOutcome {
        self.selection.select_option(product_id, option_name, value)
    }

    #[must_use]
    pub fn view(&self) -> QuickViewModel {
        QuickViewModel::build(
            self.modal.is_open(),
            self.modal.active_handle(),
            self.loader.state(),
            &self.selection,
        )
    }

    /// The line to add, or `None` while adding is disabled.
    #[must_use]
    pub fn add_to_bag(&self) -> Option<CartLine> {
        if let Some(reason) = self.selection.add_disabled_reason() {
            tracing::debug!(?reason, "add to bag is disabled");
            return None;
        }
        let variant = self.selection.resolved_variant()?;
        tracing::info!(variant_id = %variant.id, "adding variant to bag");
        Some(CartLine {
            variant_id: variant.id.clone(),
            quantity: 1,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        self.modal.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.modal.host_mut()
    }

    fn sync_product(&mut self) {
        self.selection.set_product(self.loader.state().product.clone());
        self.modal.retry_initial_focus();
    }

    fn teardown(&mut self) {
        self.loader.request(None);
        self.selection.set_product(None);
    }
}
