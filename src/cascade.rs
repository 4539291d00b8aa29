//! Cascading selection
//!
//! A [`Cascade`] holds a list that depends on a parent selection (the seasons
//! of a series, the episodes of a season). Every parent change cancels the
//! fetch in flight and issues a new one; only the most recently issued fetch
//! may ever write into the list.
//!
//! The controller never performs I/O itself. [`Cascade::select`] hands back a
//! [`Fetch`] for the caller to run, and the outcome comes back through
//! [`Cascade::settle`] together with the fetch's [`Ticket`].

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{is_cancelled, user_message};
use crate::models::{merge_sorted, sort_by_number, Numbered};

/// Load state of a dependent list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum LoadState {
    /// No parent selected, list empty
    #[default]
    Idle,
    /// Parent selected, fetch in flight
    Loading,
    /// Fetch completed, list populated
    Ready,
    /// Fetch completed with a displayable error
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A fetch the caller has to run: list the children of `parent`, honoring `token`
#[derive(Debug, Clone)]
pub struct Fetch {
    pub parent: String,
    pub ticket: Ticket,
    pub token: CancellationToken,
}

/// Whether a settlement reached the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Discarded,
}

/// Dependent list bound to one parent selection
#[derive(Debug)]
pub struct Cascade<T> {
    parent: Option<String>,
    items: Vec<T>,
    state: LoadState,
    in_flight: Option<(Ticket, CancellationToken)>,
    issued: u64,
}

impl<T> Default for Cascade<T> {
    fn default() -> Self {
        Self {
            parent: None,
            items: Vec::new(),
            state: LoadState::Idle,
            in_flight: None,
            issued: 0,
        }
    }
}

impl<T: Numbered> Cascade<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Token of the fetch currently allowed to commit
    pub fn in_flight(&self) -> Option<&CancellationToken> {
        self.in_flight.as_ref().map(|(_, token)| token)
    }

    /// Change the parent selection.
    ///
    /// Selecting the current parent again is a no-op (use [`Cascade::reload`]).
    /// Any other change cancels the fetch in flight and clears the list; a
    /// non-empty selection returns the fetch to run.
    pub fn select(&mut self, parent: Option<String>) -> Option<Fetch> {
        let parent = parent.filter(|p| !p.trim().is_empty());
        if parent == self.parent {
            return None;
        }

        self.cancel_in_flight();
        self.items.clear();
        self.parent = parent;

        match self.parent.clone() {
            Some(parent) => Some(self.issue(parent)),
            None => {
                self.state = LoadState::Idle;
                None
            }
        }
    }

    /// Fetch the current parent's list again, superseding any fetch in flight
    pub fn reload(&mut self) -> Option<Fetch> {
        let parent = self.parent.clone()?;
        self.cancel_in_flight();
        Some(self.issue(parent))
    }

    /// Apply the outcome of a fetch, unless it has been superseded or cancelled
    pub fn settle(&mut self, ticket: Ticket, result: anyhow::Result<Vec<T>>) -> Settled {
        let current = matches!(
            &self.in_flight,
            Some((live, token)) if *live == ticket && !token.is_cancelled()
        );
        if !current {
            debug!(ticket = ticket.0, "discarding stale fetch result");
            return Settled::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(mut items) => {
                sort_by_number(&mut items);
                self.items = items;
                self.state = LoadState::Ready;
            }
            Err(err) if is_cancelled(&err) => {
                // live token but the transport reported a cancellation; nothing to show
                debug!(ticket = ticket.0, "fetch reported cancellation without a cancel signal");
                self.state = LoadState::Ready;
            }
            Err(err) => {
                let message = user_message(&err);
                warn!(parent = ?self.parent, error = %message, "dependent fetch failed");
                self.items.clear();
                self.state = LoadState::Failed(message);
            }
        }
        Settled::Applied
    }

    /// Merge an entity created under `parent` into the sorted list.
    ///
    /// Ignored when the selection has moved on to another parent. A failed
    /// load becomes `Ready`, since the list now holds what the server confirmed.
    pub fn merge(&mut self, parent: &str, item: T) -> bool {
        if self.parent.as_deref() != Some(parent) {
            debug!(parent, "created entity belongs to a deselected parent");
            return false;
        }
        merge_sorted(&mut self.items, item);
        if matches!(self.state, LoadState::Failed(_)) {
            self.state = LoadState::Ready;
        }
        true
    }

    fn issue(&mut self, parent: String) -> Fetch {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let token = CancellationToken::new();
        self.in_flight = Some((ticket, token.clone()));
        self.state = LoadState::Loading;
        debug!(%parent, ticket = ticket.0, "issuing dependent fetch");
        Fetch {
            parent,
            ticket,
            token,
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some((ticket, token)) = self.in_flight.take() {
            token.cancel();
            debug!(ticket = ticket.0, "cancelled superseded fetch");
        }
    }
}
