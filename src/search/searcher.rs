//! The page searcher façade.
//!
//! Ties linearize → match → rewrite → store together behind the public
//! listener-based API. All operations are synchronous: a `search` call
//! fully supersedes the previous one before it returns, so listeners
//! observe `cleared` and `searched` in order with nothing interleaved.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::DomTree;
use crate::render::layout::{compute_layout, LayoutMap};
use crate::render::Viewport;

use super::highlight::{self, Highlight};
use super::linearize::linearize;
use super::matcher::{self, SearchError};
use super::rewrite::rewrite;
use super::store::{HighlightStore, SelectionChange};

type ListenerId = usize;
type Callback<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;
type Registry<T> = Rc<RefCell<RegistryInner<T>>>;

struct RegistryInner<T> {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Callback<T>)>,
}

/// Multi-subscriber callback registry for one event kind.
struct Listeners<T> {
    inner: Registry<T>,
}

impl<T: 'static> Listeners<T> {
    fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    fn add(&self, callback: Box<dyn FnMut(&T)>) -> Unsubscriber {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, Rc::new(RefCell::new(callback))));
            id
        };
        let registry = Rc::downgrade(&self.inner);
        Unsubscriber {
            cancel: Box::new(move || {
                if let Some(inner) = registry.upgrade() {
                    inner.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            }),
        }
    }

    /// Call every registered listener in subscription order. The
    /// registry is not borrowed while a callback runs, so a listener
    /// may unsubscribe (even itself); one unsubscribed mid-emit is not
    /// called afterwards.
    fn emit(&self, event: &T) {
        let snapshot: Vec<(ListenerId, Callback<T>)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(id, callback)| (*id, callback.clone()))
            .collect();
        for (id, callback) in snapshot {
            let still_subscribed = self
                .inner
                .borrow()
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if still_subscribed {
                (callback.borrow_mut())(event);
            }
        }
    }
}

/// Capability to detach one previously registered listener.
pub struct Unsubscriber {
    cancel: Box<dyn FnOnce()>,
}

impl Unsubscriber {
    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

/// Regex search with highlight navigation over one parsed page.
pub struct PageSearcher {
    tree: DomTree,
    viewport: Viewport,
    layout: LayoutMap,
    store: HighlightStore,
    searched: Listeners<usize>,
    selection_changed: Listeners<usize>,
    cleared: Listeners<()>,
    error: Listeners<SearchError>,
}

impl PageSearcher {
    pub fn new(tree: DomTree, viewport: Viewport) -> Self {
        let layout = compute_layout(&tree.root, viewport.width);
        Self {
            tree,
            viewport,
            layout,
            store: HighlightStore::new(),
            searched: Listeners::new(),
            selection_changed: Listeners::new(),
            cleared: Listeners::new(),
            error: Listeners::new(),
        }
    }

    /// Parse `html` and build a searcher over the whole document.
    pub fn from_html(html: &str, url: &str, viewport: Viewport) -> Self {
        Self::new(crate::dom::parser::parse_html(html, url), viewport)
    }

    pub fn dom(&self) -> &DomTree {
        &self.tree
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Number of navigable matches in the current result.
    pub fn match_count(&self) -> usize {
        self.store.total()
    }

    /// Cursor position in the current result, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.store.selected()
    }

    /// Run a search over the page.
    ///
    /// An empty query behaves like [`clear`](Self::clear), except the
    /// `cleared` event always fires. A query that fails to compile
    /// emits an error event and leaves the previous result untouched.
    pub fn search(&mut self, query: &str, flags: &str) {
        if query.is_empty() {
            self.restore_dom();
            self.cleared.emit(&());
            return;
        }

        // Compile before clearing so a bad pattern cannot wipe the
        // previous result.
        let re = match matcher::compile(query, flags) {
            Ok(re) => re,
            Err(err) => {
                log::debug!("rejected pattern {:?}: {}", query, err);
                self.error.emit(&err);
                return;
            }
        };

        if !self.store.is_cleared() {
            self.restore_dom();
            self.cleared.emit(&());
        }

        let index = linearize(&self.tree.root);
        if index.is_empty() {
            return;
        }
        let spans = matcher::find_spans(&re, &index.text);
        let outcome = rewrite(&mut self.tree, &index, &spans);

        // Boxes move when nodes split; recompute before filtering.
        self.layout = compute_layout(&self.tree.root, self.viewport.width);
        let (groups, highlights) = outcome.into_parts();
        let highlights: Vec<Highlight> = highlights
            .into_iter()
            .filter(|h| h.is_visible(&self.layout))
            .collect();

        let searched = self.store.set_search_result(groups, highlights);
        if let Some(initial) = searched.initial {
            if let Some(first) = self.store.highlight(initial) {
                first.select(&mut self.tree, &self.layout, &mut self.viewport);
            }
        }
        log::debug!("search {:?} -> {} matches", query, searched.total);
        self.searched.emit(&searched.total);
    }

    /// Step to the next match, wrapping at the end. No-op without
    /// results.
    pub fn next_result(&mut self) {
        if let Some(change) = self.store.forward() {
            self.apply_selection(change);
        }
    }

    /// Step to the previous match, wrapping at the start.
    pub fn previous_result(&mut self) {
        if let Some(change) = self.store.backward() {
            self.apply_selection(change);
        }
    }

    /// Remove all highlight markup, restoring the original text nodes.
    /// Idempotent: a second call changes nothing and stays silent.
    pub fn clear(&mut self) {
        if self.store.is_cleared() {
            return;
        }
        self.restore_dom();
        self.cleared.emit(&());
    }

    fn restore_dom(&mut self) {
        let cleared = self.store.clear();
        if let Some(selected) = cleared.selected {
            if let Some(h) = cleared.highlights.get(selected) {
                h.unselect(&mut self.tree);
            }
        }
        for group in &cleared.groups {
            group.clear(&mut self.tree);
        }
        // Sweep wrappers the store lost track of
        highlight::clear_all_groups(&mut self.tree);
    }

    fn apply_selection(&mut self, change: SelectionChange) {
        if let Some(previous) = self.store.highlight(change.previous) {
            previous.unselect(&mut self.tree);
        }
        if let Some(next) = self.store.highlight(change.next) {
            next.select(&mut self.tree, &self.layout, &mut self.viewport);
        }
        self.selection_changed.emit(&change.next);
    }

    /// Notified with the navigable match total after every completed
    /// search.
    pub fn on_searched(&self, mut listener: impl FnMut(usize) + 'static) -> Unsubscriber {
        self.searched.add(Box::new(move |total| listener(*total)))
    }

    /// Notified with the new cursor index after every navigation step.
    pub fn on_selection_changed(
        &self,
        mut listener: impl FnMut(usize) + 'static,
    ) -> Unsubscriber {
        self.selection_changed.add(Box::new(move |current| listener(*current)))
    }

    /// Notified when highlights are removed.
    pub fn on_cleared(&self, mut listener: impl FnMut() + 'static) -> Unsubscriber {
        self.cleared.add(Box::new(move |()| listener()))
    }

    /// Notified when a query fails to compile.
    pub fn on_error(&self, listener: impl FnMut(&SearchError) + 'static) -> Unsubscriber {
        self.error.add(Box::new(listener))
    }
}
