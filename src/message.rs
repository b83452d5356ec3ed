//! Wire types for the extension transport.
//!
//! The popup and devtools panel drive the searcher through tagged JSON
//! messages; the content script answers with events. [`apply`] is the
//! synchronous dispatcher: one inbound command in, the events it
//! produced out, in emission order.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::search::{PageSearcher, SearchError};

/// Inbound command from the UI process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    #[serde(rename = "SEARCH")]
    Search { query: String, flags: String },
    #[serde(rename = "NEXT_RESULT")]
    NextResult,
    #[serde(rename = "PREVIOUS_RESULT")]
    PreviousResult,
    #[serde(rename = "CLEAR_RESULT")]
    ClearResult,
    #[serde(rename = "GET_CURSOR_SELECTION")]
    GetCursorSelection,
}

/// Outbound event relayed back to the UI process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    #[serde(rename = "SEARCHED")]
    Searched { total: usize },
    #[serde(rename = "CHANGE_HIGHLIGHT")]
    ChangeHighlight { current: usize },
    #[serde(rename = "CLEARED")]
    Cleared,
    #[serde(rename = "ERROR")]
    Error {
        kind: ErrorKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    #[serde(rename = "CURSOR_SELECTION")]
    CursorSelection {
        current: Option<usize>,
        total: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "INVALID_FLAGS")]
    InvalidFlags,
    #[serde(rename = "UNHANDLED")]
    Unhandled,
}

impl Event {
    fn from_error(error: &SearchError) -> Self {
        match error {
            SearchError::InvalidFlags(_) => Event::Error {
                kind: ErrorKind::InvalidFlags,
                detail: None,
            },
            SearchError::MalformedPattern(inner) => Event::Error {
                kind: ErrorKind::Unhandled,
                detail: Some(inner.to_string()),
            },
        }
    }
}

/// Apply one inbound command to the searcher, returning the events it
/// produced. Delivery is assumed exactly-once; the caller relays the
/// events back over the transport.
pub fn apply(searcher: &mut PageSearcher, command: &Command) -> Vec<Event> {
    let sink: Rc<RefCell<Vec<Event>>> = Rc::new(RefCell::new(Vec::new()));

    let subs = [
        {
            let sink = sink.clone();
            searcher.on_searched(move |total| sink.borrow_mut().push(Event::Searched { total }))
        },
        {
            let sink = sink.clone();
            searcher.on_selection_changed(move |current| {
                sink.borrow_mut().push(Event::ChangeHighlight { current })
            })
        },
        {
            let sink = sink.clone();
            searcher.on_cleared(move || sink.borrow_mut().push(Event::Cleared))
        },
        {
            let sink = sink.clone();
            searcher.on_error(move |error| sink.borrow_mut().push(Event::from_error(error)))
        },
    ];

    match command {
        Command::Search { query, flags } => searcher.search(query, flags),
        Command::NextResult => searcher.next_result(),
        Command::PreviousResult => searcher.previous_result(),
        Command::ClearResult => searcher.clear(),
        Command::GetCursorSelection => sink.borrow_mut().push(Event::CursorSelection {
            current: searcher.selected_index(),
            total: searcher.match_count(),
        }),
    }

    for sub in subs {
        sub.unsubscribe();
    }
    sink.take()
}
