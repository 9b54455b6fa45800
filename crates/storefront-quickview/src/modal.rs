//! Modal lifecycle: scroll lock and focus containment scoped to the time the
//! quick view is open.
//!
//! The page is a single owned [`PageHost`]. Opening acquires both resources
//! once; every exit path (explicit close, Escape, backdrop click, drop of the
//! manager) releases them exactly once.

use serde::Serialize;
use storefront_core::Handle;

/// Opaque reference to an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

/// The body styles a scroll lock overrides, captured so they can be put back
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyStyle {
    pub overflow_hidden: bool,
    /// Right padding in pixels; compensates for the hidden scrollbar.
    pub padding_right_px: u32,
    pub position_fixed: bool,
    /// Offset applied while fixed so the page does not jump to the top.
    pub top_px: i64,
    pub full_width: bool,
}

/// The page the modal lives on: keyboard focus and document scroll.
pub trait PageHost {
    fn active_element(&self) -> Option<ElementId>;
    /// Returns `false` once the element has been removed from the page.
    fn is_connected(&self, element: ElementId) -> bool;
    fn focus(&mut self, element: ElementId);
    /// Safe fallback focus target, always connected.
    fn document_root(&self) -> ElementId;
    /// The element marked as the dialog.
    fn dialog_root(&self) -> ElementId;
    /// Focusable elements inside the dialog, in tab order, as of now.
    fn dialog_focusables(&self) -> Vec<ElementId>;

    fn body_style(&self) -> BodyStyle;
    fn set_body_style(&mut self, style: BodyStyle);
    fn scroll_offset(&self) -> u32;
    fn scroll_to(&mut self, offset: u32);
    fn scrollbar_width(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    ShiftTab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Backdrop,
    /// Anything inside the dialog body; never reaches the backdrop handler.
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Explicit,
    Escape,
    Backdrop,
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// Already open; the session now shows a different product.
    Switched,
    /// Already open on this product.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Focus cycled within the dialog; the default action is suppressed.
    FocusMoved(ElementId),
    /// Nothing focusable yet; focus stays on the dialog.
    FocusHeld,
    Closed(CloseReason),
}

struct ScrollLock {
    saved_style: BodyStyle,
    saved_offset: u32,
}

impl ScrollLock {
    fn acquire<H: PageHost>(host: &mut H) -> Self {
        let saved_style = host.body_style();
        let saved_offset = host.scroll_offset();
        let scrollbar_width = host.scrollbar_width();

        host.set_body_style(BodyStyle {
            overflow_hidden: true,
            padding_right_px: if scrollbar_width > 0 {
                scrollbar_width
            } else {
                saved_style.padding_right_px
            },
            position_fixed: true,
            top_px: -i64::from(saved_offset),
            full_width: true,
        });

        Self {
            saved_style,
            saved_offset,
        }
    }

    fn release<H: PageHost>(self, host: &mut H) {
        host.set_body_style(self.saved_style);
        host.scroll_to(self.saved_offset);
    }
}

struct FocusTrap {
    trigger: Option<ElementId>,
    previously_focused: Option<ElementId>,
    /// Remaining attempts to move focus onto the first focusable element.
    pending_attempts: u32,
}

impl FocusTrap {
    fn acquire<H: PageHost>(host: &mut H, trigger: Option<ElementId>, attempts: u32) -> Self {
        let mut trap = Self {
            trigger,
            previously_focused: host.active_element(),
            pending_attempts: attempts.saturating_add(1),
        };
        if !trap.try_initial_focus(host) {
            let dialog = host.dialog_root();
            host.focus(dialog);
        }
        trap
    }

    /// Focuses the first focusable element if one exists and attempts remain.
    fn try_initial_focus<H: PageHost>(&mut self, host: &mut H) -> bool {
        if self.pending_attempts == 0 {
            return false;
        }
        self.pending_attempts -= 1;
        match host.dialog_focusables().first() {
            Some(&first) => {
                host.focus(first);
                self.pending_attempts = 0;
                true
            }
            None => false,
        }
    }

    fn release<H: PageHost>(self, host: &mut H) {
        let target = self.trigger.or(self.previously_focused);
        match target.filter(|el| host.is_connected(*el)) {
            Some(el) => host.focus(el),
            None => {
                let root = host.document_root();
                if target.is_some() {
                    tracing::warn!(
                        ?target,
                        "return-focus target is gone; focusing document root"
                    );
                }
                host.focus(root);
            }
        }
    }
}

struct OpenSession {
    handle: Handle,
    scroll: ScrollLock,
    focus: FocusTrap,
}

enum ModalState {
    Closed,
    Open(OpenSession),
}

pub struct ModalManager<H: PageHost> {
    host: H,
    state: ModalState,
    focus_retry_attempts: u32,
}

impl<H: PageHost> ModalManager<H> {
    /// `focus_retry_attempts` bounds how many content changes may retry the
    /// initial focus after an open that found nothing focusable.
    pub fn new(host: H, focus_retry_attempts: u32) -> Self {
        Self {
            host,
            state: ModalState::Closed,
            focus_retry_attempts,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    #[must_use]
    pub fn active_handle(&self) -> Option<&Handle> {
        match &self.state {
            ModalState::Open(session) => Some(&session.handle),
            ModalState::Closed => None,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Opens the modal on `handle`, or retargets an open one.
    ///
    /// On a fresh open the current focus (or `trigger`, when given) becomes
    /// the return-focus target, scroll is locked and focus moves into the
    /// dialog. When already open the resources stay as they are; only the
    /// handle and, if supplied, the trigger are replaced.
    pub fn open(&mut self, handle: Handle, trigger: Option<ElementId>) -> OpenOutcome {
        if let ModalState::Open(session) = &mut self.state {
            if trigger.is_some() {
                session.focus.trigger = trigger;
            }
            if session.handle == handle {
                return OpenOutcome::Unchanged;
            }
            tracing::debug!(from = %session.handle, to = %handle, "quick view switched product");
            session.handle = handle;
            return OpenOutcome::Switched;
        }

        let scroll = ScrollLock::acquire(&mut self.host);
        let focus = FocusTrap::acquire(&mut self.host, trigger, self.focus_retry_attempts);
        tracing::info!(%handle, "quick view opened");
        self.state = ModalState::Open(OpenSession {
            handle,
            scroll,
            focus,
        });
        OpenOutcome::Opened
    }

    /// Closes the modal, restoring scroll and focus. Returns `false` if it
    /// was already closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let ModalState::Open(session) = std::mem::replace(&mut self.state, ModalState::Closed)
        else {
            return false;
        };
        session.scroll.release(&mut self.host);
        session.focus.release(&mut self.host);
        tracing::info!(handle = %session.handle, ?reason, "quick view closed");
        true
    }

    /// Retries the initial focus after the dialog content changed.
    ///
    /// Returns `true` if focus moved onto a dialog element.
    pub fn retry_initial_focus(&mut self) -> bool {
        match &mut self.state {
            ModalState::Open(session) => session.focus.try_initial_focus(&mut self.host),
            ModalState::Closed => false,
        }
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let ModalState::Open(session) = &mut self.state else {
            return KeyOutcome::Ignored;
        };

        let backwards = match key {
            Key::Escape => {
                self.close(CloseReason::Escape);
                return KeyOutcome::Closed(CloseReason::Escape);
            }
            Key::Other => return KeyOutcome::Ignored,
            Key::Tab => false,
            Key::ShiftTab => true,
        };

        // The shopper is navigating; stop trying to place initial focus.
        session.focus.pending_attempts = 0;

        let focusables = self.host.dialog_focusables();
        if focusables.is_empty() {
            let dialog = self.host.dialog_root();
            if self.host.active_element() != Some(dialog) {
                self.host.focus(dialog);
            }
            return KeyOutcome::FocusHeld;
        }

        let len = focusables.len();
        let current = self
            .host
            .active_element()
            .and_then(|active| focusables.iter().position(|el| *el == active));
        let next = match (current, backwards) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };
        let target = focusables[next];
        self.host.focus(target);
        KeyOutcome::FocusMoved(target)
    }

    /// Handles a click. Backdrop clicks close; clicks inside the dialog are
    /// contained. Returns `true` if the modal closed.
    pub fn handle_pointer(&mut self, target: PointerTarget) -> bool {
        match target {
            PointerTarget::Backdrop => self.close(CloseReason::Backdrop),
            PointerTarget::Dialog => false,
        }
    }
}

impl<H: PageHost> Drop for ModalManager<H> {
    fn drop(&mut self) {
        self.close(CloseReason::Unmount);
    }
}

#[cfg(test)]
#[path = "modal_test.rs"]
mod tests;
