//! # Auth gate: domain allowlist and usage-session lifecycle
//!
//! [`AuthGate`] sits between the identity provider and the rest of the app. Every
//! time the provider reports who is signed in (after the OAuth callback, or when a
//! page asks for the current user) the gate is fed that principal and decides:
//!
//! ```text
//! Unauthenticated ──observe(Some)──▶ Checking ──allowed──▶ Authenticated
//!        ▲                                  └──rejected─▶ Rejected (provider signed out)
//!        └────────── observe(None) / logout ──────────────┘
//! ```
//!
//! Alongside the status the gate owns the one [`SessionState`] of the browser
//! session. A usage session is opened when a principal becomes authenticated and no
//! session is open, and closed exactly once when the principal goes away. Every
//! transition goes through `&mut self`, so the open session id has a single writer
//! and rapid sign-in/sign-out sequences cannot open a second record.
//!
//! Record-store failures are logged and never block the transition: a failed open
//! leaves [`SessionState::NoSession`] (the next observation tries again), a failed
//! close keeps the session open so the next transition can close it.
//!
//! The state is plain serde data ([`GateState`]) so the server can keep it in the
//! tower-sessions store between requests.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::RecordStore;
use tracing::{error, info, warn};

/// A principal reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Where the signed-in principal stands.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    Checking,
    Authenticated { email: String },
    Rejected { message: String },
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            AuthStatus::Authenticated { email } => Some(email),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        match self {
            AuthStatus::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// The usage session of this browser session, if one is open.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NoSession,
    Open {
        id: String,
        email: String,
        start: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn id(&self) -> Option<&str> {
        match self {
            SessionState::Open { id, .. } => Some(id),
            SessionState::NoSession => None,
        }
    }
}

/// Serializable part of the gate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    pub status: AuthStatus,
    pub session: SessionState,
}

/// The single email domain allowed to sign in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainPolicy {
    allowed_domain: String,
}

impl DomainPolicy {
    pub fn new(allowed_domain: &str) -> Self {
        Self {
            allowed_domain: allowed_domain.trim().trim_start_matches('@').to_ascii_lowercase(),
        }
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// True when `email` ends with `@<allowed domain>`, ignoring ASCII case.
    pub fn allows(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        match email.rsplit_once('@') {
            Some((local, domain)) => !local.is_empty() && domain == self.allowed_domain,
            None => false,
        }
    }

    pub fn rejection_message(&self) -> String {
        format!("Access restricted to @{} domain.", self.allowed_domain)
    }
}

/// The part of the identity provider the gate drives.
pub trait IdentityProvider {
    /// End the provider session of the current browser.
    fn sign_out(&self) -> impl Future<Output = Result<(), String>> + Send;
}

/// Auth state machine for one browser session.
#[derive(Clone, Debug)]
pub struct AuthGate {
    policy: DomainPolicy,
    state: GateState,
}

impl AuthGate {
    pub fn new(policy: DomainPolicy) -> Self {
        Self::restore(policy, GateState::default())
    }

    /// Continue from a state saved by an earlier request.
    pub fn restore(policy: DomainPolicy, state: GateState) -> Self {
        Self { policy, state }
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn status(&self) -> &AuthStatus {
        &self.state.status
    }

    pub fn session(&self) -> &SessionState {
        &self.state.session
    }

    /// React to the provider reporting `principal` (or nobody) as signed in.
    pub async fn observe<S, P>(
        &mut self,
        principal: Option<&Principal>,
        store: &S,
        provider: &P,
    ) -> &AuthStatus
    where
        S: RecordStore + Sync,
        P: IdentityProvider + Sync,
    {
        match principal {
            Some(principal) => {
                self.state.status = AuthStatus::Checking;
                if self.policy.allows(&principal.email) {
                    self.admit(principal, store).await;
                } else {
                    self.reject(principal, store, provider).await;
                }
            }
            None => {
                self.close_session(store).await;
                if !matches!(self.state.status, AuthStatus::Rejected { .. }) {
                    self.state.status = AuthStatus::Unauthenticated;
                }
            }
        }
        &self.state.status
    }

    /// Interactive sign-in. Clears a previous rejection before checking.
    pub async fn sign_in<S, P>(&mut self, principal: &Principal, store: &S, provider: &P) -> &AuthStatus
    where
        S: RecordStore + Sync,
        P: IdentityProvider + Sync,
    {
        if matches!(self.state.status, AuthStatus::Rejected { .. }) {
            self.state.status = AuthStatus::Unauthenticated;
        }
        self.observe(Some(principal), store, provider).await
    }

    /// Interactive sign-in that also attaches an admitted principal to the app.
    ///
    /// `bind` runs only for an admitted principal. If it fails, the sign-in is
    /// undone: the usage session it opened is closed and the provider signed out.
    pub async fn sign_in_and_bind<S, P, F>(
        &mut self,
        principal: &Principal,
        store: &S,
        provider: &P,
        bind: F,
    ) -> Result<AuthStatus, String>
    where
        S: RecordStore + Sync,
        P: IdentityProvider + Sync,
        F: Future<Output = Result<(), String>>,
    {
        let status = self.sign_in(principal, store, provider).await.clone();
        if !status.is_authenticated() {
            return Ok(status);
        }
        if let Err(e) = bind.await {
            error!(error = %e, email = %principal.email, "sign_in_bind_failed");
            self.logout(store, provider).await?;
            return Err(e);
        }
        Ok(status)
    }

    /// Explicit logout: close the usage session, then sign out of the provider.
    pub async fn logout<S, P>(&mut self, store: &S, provider: &P) -> Result<(), String>
    where
        S: RecordStore + Sync,
        P: IdentityProvider + Sync,
    {
        self.close_session(store).await;
        provider.sign_out().await.map_err(|e| {
            error!(error = %e, "sign_out_failed");
            e
        })?;
        self.state.status = AuthStatus::Unauthenticated;
        Ok(())
    }

    /// The page is going away. Closing is attempted but may never be delivered.
    pub async fn on_unload<S>(&mut self, store: &S)
    where
        S: RecordStore + Sync,
    {
        self.close_session(store).await;
    }

    async fn admit<S>(&mut self, principal: &Principal, store: &S)
    where
        S: RecordStore + Sync,
    {
        // A different account took over the browser session.
        if let SessionState::Open { email, .. } = &self.state.session {
            if !email.eq_ignore_ascii_case(&principal.email) {
                self.close_session(store).await;
            }
        }

        self.state.status = AuthStatus::Authenticated {
            email: principal.email.clone(),
        };

        if self.state.session == SessionState::NoSession {
            self.open_session(&principal.email, store).await;
        }
    }

    async fn reject<S, P>(&mut self, principal: &Principal, store: &S, provider: &P)
    where
        S: RecordStore + Sync,
        P: IdentityProvider + Sync,
    {
        warn!(email = %principal.email, domain = %self.policy.allowed_domain(), "auth_domain_rejected");
        if let Err(e) = provider.sign_out().await {
            error!(error = %e, "sign_out_failed");
        }
        self.close_session(store).await;
        self.state.status = AuthStatus::Rejected {
            message: self.policy.rejection_message(),
        };
    }

    async fn open_session<S>(&mut self, email: &str, store: &S)
    where
        S: RecordStore + Sync,
    {
        let start = Utc::now();
        match store.open_session(email, start).await {
            Ok(id) => {
                info!(session_id = %id, email, "usage_session_opened");
                self.state.session = SessionState::Open {
                    id,
                    email: email.to_string(),
                    start,
                };
            }
            Err(e) => error!(error = %e, email, "usage_session_open_failed"),
        }
    }

    async fn close_session<S>(&mut self, store: &S)
    where
        S: RecordStore + Sync,
    {
        let Some(id) = self.state.session.id().map(str::to_string) else {
            return;
        };
        match store.close_session(&id, Utc::now()).await {
            Ok(closed) => {
                info!(session_id = %id, already_closed = !closed, "usage_session_closed");
                self.state.session = SessionState::NoSession;
            }
            Err(store::StoreError::UnknownSession(_)) => {
                warn!(session_id = %id, "usage_session_missing");
                self.state.session = SessionState::NoSession;
            }
            Err(e) => error!(error = %e, session_id = %id, "usage_session_close_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use store::MemoryStore;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeProvider {
        sign_outs: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        fn sign_outs(&self) -> usize {
            self.sign_outs.load(Ordering::SeqCst)
        }
    }

    impl IdentityProvider for FakeProvider {
        fn sign_out(&self) -> impl Future<Output = Result<(), String>> + Send {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        }
    }

    fn gate() -> AuthGate {
        AuthGate::new(DomainPolicy::new("dynaproco.com"))
    }

    fn ana() -> Principal {
        Principal::new("ana@dynaproco.com")
    }

    #[test]
    fn test_domain_policy() {
        let policy = DomainPolicy::new("@Dynaproco.com");
        assert!(policy.allows("ana@dynaproco.com"));
        assert!(policy.allows("Ana@DYNAPROCO.COM"));
        assert!(!policy.allows("ana@gmail.com"));
        assert!(!policy.allows("ana@notdynaproco.com"));
        assert!(!policy.allows("ana@dynaproco.com.evil.io"));
        assert!(!policy.allows("@dynaproco.com"));
        assert!(!policy.allows("dynaproco.com"));
        assert_eq!(policy.rejection_message(), "Access restricted to @dynaproco.com domain.");
    }

    #[tokio::test]
    async fn test_allowed_login_opens_one_session() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        let status = gate.sign_in(&ana(), &store, &provider).await;
        assert_eq!(status.email(), Some("ana@dynaproco.com"));
        assert_eq!(store.open_sessions().len(), 1);
        assert_eq!(gate.session().id(), Some(store.sessions()[0].id.as_str()));
        assert_eq!(provider.sign_outs(), 0);
    }

    #[tokio::test]
    async fn test_rejected_login() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        let status = gate
            .sign_in(&Principal::new("mallory@gmail.com"), &store, &provider)
            .await
            .clone();
        assert_eq!(
            status,
            AuthStatus::Rejected {
                message: "Access restricted to @dynaproco.com domain.".to_string()
            }
        );
        assert!(store.sessions().is_empty());
        assert_eq!(provider.sign_outs(), 1);
        assert_eq!(gate.session(), &SessionState::NoSession);
    }

    #[tokio::test]
    async fn test_rejection_message_survives_provider_sign_out() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&Principal::new("mallory@gmail.com"), &store, &provider).await;
        // The forced sign-out makes the provider report nobody.
        gate.observe(None, &store, &provider).await;
        assert!(gate.status().rejection().is_some());

        gate.sign_in(&ana(), &store, &provider).await;
        assert!(gate.status().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_closes_exactly_one_session() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&ana(), &store, &provider).await;
        gate.logout(&store, &provider).await.unwrap();

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].end_time.is_some());
        assert!(sessions[0].start_time <= sessions[0].end_time.unwrap());
        assert_eq!(gate.status(), &AuthStatus::Unauthenticated);
        assert_eq!(gate.session(), &SessionState::NoSession);
        assert_eq!(provider.sign_outs(), 1);
    }

    #[tokio::test]
    async fn test_repeated_observations_do_not_open_twice() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&ana(), &store, &provider).await;
        gate.observe(Some(&ana()), &store, &provider).await;
        gate.observe(Some(&ana()), &store, &provider).await;
        assert_eq!(store.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_provider_losing_user_closes_once() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&ana(), &store, &provider).await;
        gate.observe(None, &store, &provider).await;
        gate.observe(None, &store, &provider).await;
        gate.logout(&store, &provider).await.unwrap();

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_open());
        assert_eq!(gate.status(), &AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_flapping_creates_one_session_per_interval() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        for _ in 0..3 {
            gate.observe(Some(&ana()), &store, &provider).await;
            gate.observe(Some(&ana()), &store, &provider).await;
            gate.observe(None, &store, &provider).await;
        }
        let sessions = store.sessions();
        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|s| !s.is_open()));
    }

    #[tokio::test]
    async fn test_account_switch_closes_previous_session() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&ana(), &store, &provider).await;
        gate.sign_in(&Principal::new("bo@dynaproco.com"), &store, &provider).await;

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 2);
        assert!(!sessions[0].is_open());
        assert_eq!(sessions[1].email, "bo@dynaproco.com");
        assert!(sessions[1].is_open());
    }

    #[tokio::test]
    async fn test_failed_open_is_retried_on_next_observation() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        store.set_unavailable(true);
        gate.sign_in(&ana(), &store, &provider).await;
        assert!(gate.status().is_authenticated());
        assert_eq!(gate.session(), &SessionState::NoSession);

        store.set_unavailable(false);
        gate.observe(Some(&ana()), &store, &provider).await;
        assert_eq!(store.open_sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_unload_close_keeps_session_for_later() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        gate.sign_in(&ana(), &store, &provider).await;
        store.set_unavailable(true);
        gate.on_unload(&store).await;
        assert!(gate.session().id().is_some());

        store.set_unavailable(false);
        gate.on_unload(&store).await;
        assert_eq!(gate.session(), &SessionState::NoSession);
        assert!(store.open_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_bind_closes_the_new_session() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();

        let result = gate
            .sign_in_and_bind(&ana(), &store, &provider, async {
                Err("users table unavailable".to_string())
            })
            .await;

        assert_eq!(result, Err("users table unavailable".to_string()));
        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_open());
        assert_eq!(gate.session(), &SessionState::NoSession);
        assert_eq!(gate.status(), &AuthStatus::Unauthenticated);
        assert_eq!(provider.sign_outs(), 1);
    }

    #[tokio::test]
    async fn test_bind_runs_only_for_admitted_principals() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let bound = Arc::new(AtomicUsize::new(0));
        let mut gate = gate();

        let bind = |bound: Arc<AtomicUsize>| async move {
            bound.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        let rejected = gate
            .sign_in_and_bind(
                &Principal::new("mallory@gmail.com"),
                &store,
                &provider,
                bind(bound.clone()),
            )
            .await
            .unwrap();
        assert!(rejected.rejection().is_some());
        assert_eq!(bound.load(Ordering::SeqCst), 0);
        assert!(store.sessions().is_empty());

        let admitted = gate
            .sign_in_and_bind(&ana(), &store, &provider, bind(bound.clone()))
            .await
            .unwrap();
        assert!(admitted.is_authenticated());
        assert_eq!(bound.load(Ordering::SeqCst), 1);
        assert_eq!(store.open_sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_state_survives_serialization() {
        let store = MemoryStore::new();
        let provider = FakeProvider::default();
        let mut gate = gate();
        gate.sign_in(&ana(), &store, &provider).await;

        let saved = serde_json::to_string(gate.state()).unwrap();
        let restored: GateState = serde_json::from_str(&saved).unwrap();
        let mut gate = AuthGate::restore(DomainPolicy::new("dynaproco.com"), restored);

        gate.observe(Some(&ana()), &store, &provider).await;
        assert_eq!(store.sessions().len(), 1);
        gate.logout(&store, &provider).await.unwrap();
        assert!(store.open_sessions().is_empty());
    }
}
