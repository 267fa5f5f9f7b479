//! Serialized gate updates per browser session.
//!
//! A request that changes the gate loads the saved [`GateState`], runs one
//! transition and writes the result back. [`GateSlots`] holds one async mutex per
//! browser-session id for that whole span, and keeps the last released state next
//! to it. Concurrent polls and unload beacons of one browser therefore see each
//! other's writes instead of racing on the session record.
//!
//! The cached state is the source of truth while it is present; the session store
//! is only read when this process has not seen the browser session yet. Slots that
//! are idle and back in the initial state are dropped on the next acquisition.

use std::collections::HashMap;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::gate::{AuthGate, DomainPolicy, GateState};

type Slot = Arc<AsyncMutex<Option<GateState>>>;

/// Per-browser-session locks plus the last state each one released.
#[derive(Debug, Default)]
pub struct GateSlots {
    slots: Mutex<HashMap<String, Slot>>,
}

impl GateSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of browser sessions currently tracked.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock the gate of browser session `key`.
    ///
    /// `saved` is awaited only when no state is cached for `key`. Without a key
    /// (a browser session that was never stored) nothing is shared and the gate is
    /// built from `saved` alone.
    pub async fn lock<F>(
        &self,
        key: Option<&str>,
        policy: DomainPolicy,
        saved: F,
    ) -> Result<LockedGate, String>
    where
        F: Future<Output = Result<Option<GateState>, String>>,
    {
        let Some(key) = key else {
            let state = saved.await?.unwrap_or_default();
            return Ok(LockedGate {
                gate: AuthGate::restore(policy, state),
                slot: None,
            });
        };

        let guard = self.slot(key).lock_owned().await;
        let state = match guard.as_ref() {
            Some(state) => state.clone(),
            None => saved.await?.unwrap_or_default(),
        };
        Ok(LockedGate {
            gate: AuthGate::restore(policy, state),
            slot: Some(guard),
        })
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|k, slot| k == key || !is_idle(slot));
        slots.entry(key.to_string()).or_default().clone()
    }
}

fn is_idle(slot: &Slot) -> bool {
    if Arc::strong_count(slot) > 1 {
        return false;
    }
    match slot.try_lock() {
        Ok(state) => state.as_ref().map_or(true, |s| *s == GateState::default()),
        Err(_) => false,
    }
}

/// A gate held exclusively for its browser session until dropped.
///
/// Dropping without [`LockedGate::release`] leaves the cached state untouched.
#[derive(Debug)]
pub struct LockedGate {
    gate: AuthGate,
    slot: Option<OwnedMutexGuard<Option<GateState>>>,
}

impl LockedGate {
    /// Publish the gate's state to the next request and unlock.
    pub fn release(self) -> GateState {
        let state = self.gate.state().clone();
        if let Some(mut slot) = self.slot {
            *slot = Some(state.clone());
        }
        state
    }
}

impl Deref for LockedGate {
    type Target = AuthGate;

    fn deref(&self) -> &AuthGate {
        &self.gate
    }
}

impl DerefMut for LockedGate {
    fn deref_mut(&mut self) -> &mut AuthGate {
        &mut self.gate
    }
}
