pub mod error;
pub mod loader;
pub mod modal;
pub mod page;
pub mod quick_view;
pub mod resolver;
pub mod selection;
pub mod view;

#[cfg(test)]
mod test_fixtures;

pub use error::QuickViewError;
pub use loader::{Completion, FetchToken, LoadError, LoadState, LoadStatus, ProductLoader};
pub use modal::{
    BodyStyle, CloseReason, ElementId, Key, KeyOutcome, ModalManager, OpenOutcome, PageHost,
    PointerTarget,
};
pub use page::InMemoryPage;
pub use quick_view::{QuickView, QuickViewConfig};
pub use resolver::{
    available_values_by_option, first_available_variant, is_option_value_available,
    resolve_variant, selection_from_variant, AvailableValues,
};
pub use selection::{
    AddDisabledReason, DiscardReason, SelectOutcome, SelectionPhase, VariantSelection,
};
pub use view::{CartLine, OptionValueView, OptionView, QuickViewModel};
