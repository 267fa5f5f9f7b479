//! tower-sessions glue for the auth gate.
//!
//! The browser session carries two keys: the signed-in user id (the identity
//! provider's view) and the serialized [`GateState`] (status plus open usage session).
//! Requests of one browser session take turns on the gate through [`lock_gate`]; the
//! first touch of the session data must come after the lock so it is never stale.

use std::sync::OnceLock;

use tower_sessions::Session;

use super::gate::{GateState, IdentityProvider};
use super::lock::{GateSlots, LockedGate};
use crate::settings;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Key for storing the gate state in session.
pub const SESSION_GATE_KEY: &str = "auth_gate";

/// Signing out of the app means dropping the user id from the browser session.
pub struct SessionSignOut<'a>(pub &'a Session);

impl IdentityProvider for SessionSignOut<'_> {
    async fn sign_out(&self) -> Result<(), String> {
        self.0
            .remove::<String>(SESSION_USER_ID_KEY)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

fn gate_slots() -> &'static GateSlots {
    static SLOTS: OnceLock<GateSlots> = OnceLock::new();
    SLOTS.get_or_init(GateSlots::new)
}

async fn saved_state(session: &Session) -> Result<Option<GateState>, String> {
    session
        .get(SESSION_GATE_KEY)
        .await
        .map_err(|e| e.to_string())
}

/// Take the gate of this browser session, waiting for any other request that
/// holds it.
pub async fn lock_gate(session: &Session) -> Result<LockedGate, String> {
    let key = session.id().map(|id| id.to_string());
    gate_slots()
        .lock(key.as_deref(), settings::domain_policy(), saved_state(session))
        .await
}

/// Hand the gate to the next request and persist it with the browser session.
pub async fn save_gate(session: &Session, gate: LockedGate) -> Result<(), String> {
    let state = gate.release();
    session
        .insert(SESSION_GATE_KEY, state)
        .await
        .map_err(|e| e.to_string())
}
