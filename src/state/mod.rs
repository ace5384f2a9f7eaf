// View state management module
//
// This module provides the ViewManager which wraps ViewState with thread-safe
// access using Arc<RwLock<T>> and emits change events for the front-end.
// It is also the FrontEnd the host-processing thread calls back into.

use crate::models::{AttributeId, RequestCode, ViewState};
use crate::ui::FrontEnd;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when the view is modified
///
/// The front-end loop listens for these instead of polling the view.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewChange {
    /// The primary list was replaced
    GroupsLoaded { titles: Vec<String> },

    /// The selected group title changed
    SelectionChanged { title: Option<String> },

    /// The secondary list was replaced
    AttributesLoaded { attributes: Vec<AttributeId> },

    /// Controls were disabled for a request
    ControlsDisabled { request: RequestCode },

    /// Controls were re-enabled after a dispatch
    ControlsArmed,
}

/// Thread-safe view manager with event emission
///
/// - Provides thread-safe access to [`ViewState`] via `Arc<RwLock<T>>`
/// - Detects changes and emits [`ViewChange`] events
/// - Implements [`FrontEnd`] so the request handler can feed results back
///
/// # Related Types
///
/// - [`crate::ui::Coordinator`]: disables the view before each request
/// - [`crate::request::RequestHandler`]: calls the [`FrontEnd`] methods
pub struct ViewManager {
    /// The view state protected by RwLock for thread-safe access
    state: Arc<RwLock<ViewState>>,

    /// Broadcast channel for emitting view change events
    change_tx: broadcast::Sender<ViewChange>,
}

impl ViewManager {
    /// Create a new ViewManager with an empty, armed view
    ///
    /// # Returns
    /// A new ViewManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ViewState::default())),
            change_tx,
        }
    }

    // A panic elsewhere must not stop rearm() from reaching the view
    fn read_lock(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a snapshot of the current view
    pub fn snapshot(&self) -> ViewState {
        self.read_lock().clone()
    }

    /// Execute a function with read access to the view
    ///
    /// # Example
    /// ```ignore
    /// let busy = view_manager.read(|view| view.is_busy());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ViewState) -> R,
    {
        let state = self.read_lock();
        f(&state)
    }

    /// Update the view and emit change events
    ///
    /// # Returns
    /// The ViewChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<ViewChange>
    where
        F: FnOnce(&mut ViewState),
    {
        let mut state = self.write_lock();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);

        // Sent under the write lock so subscribers see updates in lock order
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.change_tx.send(change.clone());
        }
        drop(state);

        changes
    }

    /// Subscribe to view change events
    pub fn subscribe(&self) -> broadcast::Receiver<ViewChange> {
        self.change_tx.subscribe()
    }

    fn detect_changes(old: &ViewState, new: &ViewState) -> Vec<ViewChange> {
        let mut changes = Vec::new();

        if old.controls_enabled && !new.controls_enabled {
            changes.push(ViewChange::ControlsDisabled {
                request: new.in_flight.unwrap_or_default(),
            });
        }

        if old.group_titles != new.group_titles {
            changes.push(ViewChange::GroupsLoaded {
                titles: new.group_titles.clone(),
            });
        }

        if old.selected_title != new.selected_title {
            changes.push(ViewChange::SelectionChanged {
                title: new.selected_title.clone(),
            });
        }

        if old.attributes != new.attributes {
            changes.push(ViewChange::AttributesLoaded {
                attributes: new.attributes.clone(),
            });
        }

        if !old.controls_enabled && new.controls_enabled {
            changes.push(ViewChange::ControlsArmed);
        }

        changes
    }

    /// Disable the controls for `request` (exit stays available).
    ///
    /// Check and disable happen under one lock. Returns false, changing
    /// nothing, if a request is already outstanding.
    pub fn doze_off(&self, request: RequestCode) -> bool {
        let mut accepted = false;
        self.update(|view| {
            if view.controls_enabled {
                view.controls_enabled = false;
                view.in_flight = Some(request);
                view.shown_on_top = false;
                accepted = true;
            }
        });
        accepted
    }

    /// Choose a title in the primary list (UI side).
    pub fn select_title(&self, title: Option<String>) -> Vec<ViewChange> {
        self.update(|view| {
            view.selected_title = title;
        })
    }

    /// Choose the `n`-th (1-based) title in the primary list.
    ///
    /// Returns the chosen title, or `None` when `n` is out of range.
    pub fn select_index(&self, n: usize) -> Option<String> {
        let title = self.read(|view| {
            n.checked_sub(1)
                .and_then(|i| view.group_titles.get(i))
                .cloned()
        })?;
        self.select_title(Some(title.clone()));
        Some(title)
    }
}

impl FrontEnd for ViewManager {
    fn selected_title(&self) -> Option<String> {
        self.read(|view| view.selected_title.clone())
    }

    fn set_primary_list(&self, titles: Vec<String>) {
        self.update(|view| {
            let still_listed = view
                .selected_title
                .as_ref()
                .is_some_and(|t| titles.contains(t));
            if !still_listed {
                view.selected_title = None;
                view.attributes.clear();
            }
            view.group_titles = titles;
        });
    }

    fn set_secondary_list(&self, attributes: Vec<AttributeId>) {
        self.update(|view| {
            view.attributes = attributes;
        });
    }

    fn rearm(&self) {
        self.update(|view| {
            view.controls_enabled = true;
            view.in_flight = None;
            view.shown_on_top = true;
        });
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same view and channel
impl Clone for ViewManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            change_tx: self.change_tx.clone(),
        }
    }
}
