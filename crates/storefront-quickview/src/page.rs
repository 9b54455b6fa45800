//! An in-memory [`PageHost`] for headless use and tests.

use crate::modal::{BodyStyle, ElementId, PageHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    DocumentRoot,
    DialogRoot,
    Page,
    Dialog,
}

#[derive(Debug, Clone)]
struct Element {
    kind: ElementKind,
    connected: bool,
}

/// A minimal document: a root, a dialog root, page elements and dialog
/// elements, with one active element and body scroll state.
#[derive(Debug, Clone)]
pub struct InMemoryPage {
    elements: Vec<Element>,
    active: Option<ElementId>,
    body: BodyStyle,
    scroll_offset: u32,
    scrollbar_width: u32,
}

impl Default for InMemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPage {
    const DOCUMENT_ROOT: ElementId = ElementId(0);
    const DIALOG_ROOT: ElementId = ElementId(1);

    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: vec![
                Element {
                    kind: ElementKind::DocumentRoot,
                    connected: true,
                },
                Element {
                    kind: ElementKind::DialogRoot,
                    connected: true,
                },
            ],
            active: None,
            body: BodyStyle::default(),
            scroll_offset: 0,
            scrollbar_width: 0,
        }
    }

    #[must_use]
    pub fn with_scrollbar_width(mut self, px: u32) -> Self {
        self.scrollbar_width = px;
        self
    }

    /// Adds a focusable element outside the dialog, e.g. a quick-view trigger.
    pub fn add_page_element(&mut self) -> ElementId {
        self.push(ElementKind::Page)
    }

    /// Adds a focusable element inside the dialog, after existing ones.
    pub fn add_dialog_element(&mut self) -> ElementId {
        self.push(ElementKind::Dialog)
    }

    /// Detaches an element. If it held focus, focus is lost.
    pub fn remove(&mut self, element: ElementId) {
        let removable = self
            .get(element)
            .is_some_and(|el| matches!(el.kind, ElementKind::Page | ElementKind::Dialog));
        if !removable {
            return;
        }
        if let Some(el) = self.get_mut(element) {
            el.connected = false;
        }
        if self.active == Some(element) {
            self.active = None;
        }
    }

    /// Detaches every dialog element, as when the dialog content unmounts.
    pub fn clear_dialog(&mut self) {
        let ids: Vec<ElementId> = self.ids_of(ElementKind::Dialog).collect();
        for id in ids {
            self.remove(id);
        }
    }

    /// Scrolls the page as a shopper would.
    pub fn set_scroll_offset(&mut self, offset: u32) {
        self.scroll_offset = offset;
    }

    fn push(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.elements.len() as u64);
        self.elements.push(Element {
            kind,
            connected: true,
        });
        id
    }

    fn get(&self, element: ElementId) -> Option<&Element> {
        usize::try_from(element.0)
            .ok()
            .and_then(|idx| self.elements.get(idx))
    }

    fn get_mut(&mut self, element: ElementId) -> Option<&mut Element> {
        usize::try_from(element.0)
            .ok()
            .and_then(|idx| self.elements.get_mut(idx))
    }

    fn ids_of(&self, kind: ElementKind) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, el)| el.kind == kind && el.connected)
            .map(|(idx, _)| ElementId(idx as u64))
    }
}

impl PageHost for InMemoryPage {
    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.get(element).is_some_and(|el| el.connected)
    }

    fn focus(&mut self, element: ElementId) {
        if self.is_connected(element) {
            self.active = Some(element);
        }
    }

    fn document_root(&self) -> ElementId {
        Self::DOCUMENT_ROOT
    }

    fn dialog_root(&self) -> ElementId {
        Self::DIALOG_ROOT
    }

    fn dialog_focusables(&self) -> Vec<ElementId> {
        self.ids_of(ElementKind::Dialog).collect()
    }

    fn body_style(&self) -> BodyStyle {
        self.body.clone()
    }

    fn set_body_style(&mut self, style: BodyStyle) {
        self.body = style;
    }

    fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    fn scroll_to(&mut self, offset: u32) {
        self.scroll_offset = offset;
    }

    fn scrollbar_width(&self) -> u32 {
        self.scrollbar_width
    }
}
