//! Health cache, selection state, and reconciliation
//!
//! `DashboardState` is the single owner of the mutable dashboard state: the
//! per-endpoint health cache, the two selection slots, and the one-shot
//! auto-select flags. Every mutation funnels through its methods, so a sweep
//! apply is atomic with respect to manual selection under the caller's lock.
//!
//! Auto-select semantics: the first sweep after a (re)load that finds at
//! least one healthy endpoint selects the first healthy one in registration
//! order, once per target slot. After that, probe results only update the
//! cache; the selection never moves on its own, even if the selected endpoint
//! goes offline or an earlier endpoint comes back. Only an explicit reload
//! re-arms auto-selection.

use crate::health::probe::ProbeResult;
use crate::registry::EndpointId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named selection slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTarget {
    /// The service detail panel
    Detail,
    /// The model-setup / chat target dropdown
    Chat,
}

impl SelectionTarget {
    pub const ALL: [SelectionTarget; 2] = [SelectionTarget::Detail, SelectionTarget::Chat];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionTarget::Detail => "detail",
            SelectionTarget::Chat => "chat",
        }
    }
}

impl std::str::FromStr for SelectionTarget {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detail" => Ok(SelectionTarget::Detail),
            "chat" => Ok(SelectionTarget::Chat),
            other => Err(crate::error::AppError::Validation(format!(
                "unknown selection target '{other}' (expected 'detail' or 'chat')"
            ))),
        }
    }
}

/// Currently active endpoint per selection slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub detail: Option<EndpointId>,
    pub chat: Option<EndpointId>,
}

impl SelectionState {
    pub fn get(&self, target: SelectionTarget) -> Option<EndpointId> {
        match target {
            SelectionTarget::Detail => self.detail,
            SelectionTarget::Chat => self.chat,
        }
    }

    fn slot_mut(&mut self, target: SelectionTarget) -> &mut Option<EndpointId> {
        match target {
            SelectionTarget::Detail => &mut self.detail,
            SelectionTarget::Chat => &mut self.chat,
        }
    }
}

/// One-shot auto-select gate per selection slot
#[derive(Debug, Clone, Copy)]
struct AutoSelectFlags {
    detail: bool,
    chat: bool,
}

impl AutoSelectFlags {
    fn armed() -> Self {
        Self {
            detail: true,
            chat: true,
        }
    }

    fn get(&self, target: SelectionTarget) -> bool {
        match target {
            SelectionTarget::Detail => self.detail,
            SelectionTarget::Chat => self.chat,
        }
    }

    fn disarm(&mut self, target: SelectionTarget) {
        match target {
            SelectionTarget::Detail => self.detail = false,
            SelectionTarget::Chat => self.chat = false,
        }
    }
}

/// Mutable dashboard state: health cache + selection + auto-select flags
pub struct DashboardState {
    cache: HashMap<EndpointId, ProbeResult>,
    selection: SelectionState,
    flags: AutoSelectFlags,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    /// Fresh state with both auto-select flags armed
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            selection: SelectionState::default(),
            flags: AutoSelectFlags::armed(),
        }
    }

    /// Apply a full sweep's results
    ///
    /// Overwrites the cache entry for every result, then performs one-shot
    /// auto-selection: for each still-armed, still-empty slot, selects the
    /// first endpoint in registration `order` whose cached result is healthy
    /// and disarms that slot's flag. If nothing is healthy, slots and flags
    /// are left untouched so a later sweep can still auto-select.
    pub fn apply_sweep(&mut self, results: Vec<ProbeResult>, order: &[EndpointId]) {
        for result in results {
            self.cache.insert(result.endpoint_id, result);
        }

        let Some(first_healthy) = self.first_healthy(order) else {
            return;
        };

        for target in SelectionTarget::ALL {
            if self.flags.get(target) && self.selection.get(target).is_none() {
                *self.selection.slot_mut(target) = Some(first_healthy);
                self.flags.disarm(target);
                tracing::info!(
                    slot = target.as_str(),
                    endpoint_id = %first_healthy,
                    "Auto-selected first healthy endpoint"
                );
            }
        }
    }

    /// Apply a single manual probe result to the cache
    ///
    /// Manual per-endpoint probes refresh that endpoint's row only; they do
    /// not drive auto-selection, which reasons over full sweeps.
    pub fn apply_single(&mut self, result: ProbeResult) {
        self.cache.insert(result.endpoint_id, result);
    }

    /// Explicit user selection: sets the slot and disarms its flag
    ///
    /// The caller is responsible for validating that `id` exists in the
    /// registry before calling.
    pub fn select(&mut self, target: SelectionTarget, id: EndpointId) {
        *self.selection.slot_mut(target) = Some(id);
        self.flags.disarm(target);
        tracing::debug!(slot = target.as_str(), endpoint_id = %id, "Selection set");
    }

    /// Unset a slot without touching its auto-select flag
    pub fn clear(&mut self, target: SelectionTarget) {
        *self.selection.slot_mut(target) = None;
        tracing::debug!(slot = target.as_str(), "Selection cleared");
    }

    /// Drop all state owned by a deleted endpoint
    ///
    /// Removes its cache entry and unselects any slot referencing it. Flags
    /// are untouched: a consumed flag stays consumed until reload.
    pub fn on_endpoint_deleted(&mut self, id: EndpointId) {
        self.cache.remove(&id);
        for target in SelectionTarget::ALL {
            if self.selection.get(target) == Some(id) {
                *self.selection.slot_mut(target) = None;
                tracing::debug!(
                    slot = target.as_str(),
                    endpoint_id = %id,
                    "Cleared selection of deleted endpoint"
                );
            }
        }
    }

    /// Re-arm auto-selection for both slots (explicit reload)
    pub fn rearm(&mut self) {
        self.flags = AutoSelectFlags::armed();
        tracing::debug!("Auto-select flags re-armed");
    }

    pub fn cached(&self, id: EndpointId) -> Option<&ProbeResult> {
        self.cache.get(&id)
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn is_armed(&self, target: SelectionTarget) -> bool {
        self.flags.get(target)
    }

    fn first_healthy(&self, order: &[EndpointId]) -> Option<EndpointId> {
        order
            .iter()
            .copied()
            .find(|id| self.cache.get(id).is_some_and(|r| r.healthy))
    }
}
