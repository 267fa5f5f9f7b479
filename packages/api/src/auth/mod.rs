//! Authentication: Google OAuth, the domain gate and the usage-session lifecycle.
//!
//! [`gate`] is plain async logic over [`store::RecordStore`] and compiles for every
//! target. The OAuth client and the tower-sessions glue are server only.

#[cfg(feature = "server")]
mod config;
pub mod gate;
#[cfg(feature = "server")]
mod google;
#[cfg(any(feature = "server", test))]
mod lock;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use config::OAuthConfig;
pub use gate::{AuthGate, AuthStatus, DomainPolicy, GateState, IdentityProvider, Principal, SessionState};
#[cfg(feature = "server")]
pub use google::{GoogleOAuth, GoogleProfile};
#[cfg(feature = "server")]
pub use lock::{GateSlots, LockedGate};
#[cfg(feature = "server")]
pub use session::{lock_gate, save_gate, SessionSignOut, SESSION_GATE_KEY, SESSION_USER_ID_KEY};
