//! Fetch-by-handle lifecycle with supersede semantics.
//!
//! Each request bumps a generation counter and carries it in its
//! [`FetchToken`]. A completion is applied only if its generation is still
//! the current one, so a stale response can never overwrite newer state no
//! matter when it arrives. Superseded fetch tasks are also aborted, which
//! drops the in-flight HTTP request, but correctness does not depend on it.

use std::sync::Arc;

use serde::Serialize;
use storefront_catalog::{CatalogError, ProductSource};
use storefront_core::{Handle, Product};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Identifies one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    generation: u64,
    handle: Handle,
}

impl FetchToken {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// The settled result of one fetch, tagged with the token that issued it.
#[derive(Debug)]
pub struct Completion {
    pub token: FetchToken,
    pub outcome: Result<Option<Product>, CatalogError>,
}

/// A fetch failure kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    pub message: String,
    /// Whether "try again" is likely to help.
    pub retryable: bool,
}

impl From<&CatalogError> for LoadError {
    fn from(err: &CatalogError) -> Self {
        Self {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    pub status: LoadStatus,
    pub handle: Option<Handle>,
    /// `None` with status `Ready` means the catalog has no such product.
    pub product: Option<Arc<Product>>,
    pub error: Option<LoadError>,
}

impl LoadState {
    const IDLE: LoadState = LoadState {
        status: LoadStatus::Idle,
        handle: None,
        product: None,
        error: None,
    };

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == LoadStatus::Ready && self.product.is_none()
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::IDLE
    }
}

enum Settled {
    Completion(Completion),
    TaskEnded(Result<(), JoinError>),
}

/// Loads product detail for at most one current handle at a time.
///
/// Fetches run as spawned tasks on the ambient tokio runtime; their results
/// are queued and only applied to [`LoadState`] from [`ProductLoader::settle`]
/// or [`ProductLoader::apply`], on the owner's control flow.
pub struct ProductLoader<S: ProductSource> {
    source: Arc<S>,
    generation: u64,
    state: LoadState,
    in_flight: Option<JoinHandle<()>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: ProductSource> ProductLoader<S> {
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            generation: 0,
            state: LoadState::default(),
            in_flight: None,
            completions_tx,
            completions_rx,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Token of the request currently loading, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<FetchToken> {
        match (&self.state.status, &self.state.handle) {
            (LoadStatus::Loading, Some(handle)) => Some(FetchToken {
                generation: self.generation,
                handle: handle.clone(),
            }),
            _ => None,
        }
    }

    /// Makes `handle` the current request.
    ///
    /// `None` cancels any in-flight fetch, drops completions already queued
    /// and clears state synchronously, without passing through `Loading`. A handle that is already loading
    /// is not fetched twice. Any other handle, including a retry of one that
    /// settled, supersedes the previous request.
    ///
    /// Must be called within a tokio runtime when `handle` is `Some`.
    pub fn request(&mut self, handle: Option<Handle>) -> Option<FetchToken> {
        let Some(handle) = handle else {
            self.supersede();
            self.discard_queued();
            self.state = LoadState::default();
            return None;
        };

        if let Some(token) = self.current_token().filter(|t| t.handle == handle) {
            return Some(token);
        }

        self.supersede();
        let token = FetchToken {
            generation: self.generation,
            handle: handle.clone(),
        };
        self.state = LoadState {
            status: LoadStatus::Loading,
            handle: Some(handle),
            product: None,
            error: None,
        };

        tracing::debug!(handle = %token.handle, generation = token.generation, "product fetch issued");

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let task_token = token.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = source.fetch_product(&task_token.handle).await;
            // The receiver lives as long as the loader; a send error only
            // means the loader is gone.
            let _ = tx.send(Completion {
                token: task_token,
                outcome,
            });
        }));

        Some(token)
    }

    /// Applies `completion` if it belongs to the current request.
    ///
    /// Returns `false`, leaving state untouched, for stale completions.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion { token, outcome } = completion;
        let current = self.state.status == LoadStatus::Loading
            && token.generation == self.generation
            && self.state.handle.as_ref() == Some(&token.handle);
        if !current {
            tracing::debug!(
                handle = %token.handle,
                generation = token.generation,
                current_generation = self.generation,
                "discarding stale product fetch result"
            );
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(product) => {
                tracing::debug!(handle = %token.handle, found = product.is_some(), "product fetch settled");
                self.state.status = LoadStatus::Ready;
                self.state.product = product.map(Arc::new);
                self.state.error = None;
            }
            Err(err) => {
                tracing::warn!(handle = %token.handle, error = %err, "product fetch failed");
                self.state.status = LoadStatus::Error;
                self.state.product = None;
                self.state.error = Some(LoadError::from(&err));
            }
        }
        true
    }

    /// Waits until the current request settles and applies its result,
    /// discarding any stale completions met on the way.
    ///
    /// Returns `true` if state changed, `false` immediately when nothing is
    /// loading.
    pub async fn settle(&mut self) -> bool {
        while self.state.status == LoadStatus::Loading {
            let event = match self.in_flight.as_mut() {
                Some(task) => tokio::select! {
                    biased;
                    Some(completion) = self.completions_rx.recv() => Settled::Completion(completion),
                    joined = task => Settled::TaskEnded(joined),
                },
                None => match self.completions_rx.recv().await {
                    Some(completion) => Settled::Completion(completion),
                    None => return false,
                },
            };

            match event {
                Settled::Completion(completion) => {
                    if self.apply(completion) {
                        return true;
                    }
                }
                // The task sends before it ends, so its completion is queued.
                Settled::TaskEnded(Ok(())) => self.in_flight = None,
                Settled::TaskEnded(Err(err)) => {
                    self.in_flight = None;
                    tracing::warn!(error = %err, "product fetch task ended without a result");
                    self.state.status = LoadStatus::Error;
                    self.state.product = None;
                    self.state.error = Some(LoadError {
                        message: "product fetch ended without a result".to_owned(),
                        retryable: true,
                    });
                    return true;
                }
            }
        }
        false
    }

    /// Applies whatever completions are already queued without waiting.
    ///
    /// Returns `true` if state changed.
    pub fn poll_settled(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completions_rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Invalidates the current request and aborts its task.
    fn supersede(&mut self) {
        self.generation += 1;
        if let Some(task) = self.in_flight.take() {
            tracing::debug!(generation = self.generation, "aborting superseded product fetch");
            task.abort();
        }
    }

    fn discard_queued(&mut self) {
        let mut discarded = 0_usize;
        while self.completions_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "dropped queued product fetch results");
        }
    }
}

impl<S: ProductSource> Drop for ProductLoader<S> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
