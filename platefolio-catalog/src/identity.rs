//! The seam to the external auth collaborator.
//!
//! The catalog never sees credentials; it sees an opaque, stable owner id
//! or nothing. Presentation code that needs to react to sign-in/sign-out
//! registers an explicit subscription at startup and deregisters it at
//! teardown; there is no implicit reactive re-render.

use platefolio_types::OwnerId;
use std::sync::{Arc, Mutex};

/// Resolves the current caller to an owner id, if anyone is signed in.
pub trait IdentityProvider: Send + Sync {
    /// The caller's resolved identity, or `None` when anonymous.
    fn current(&self) -> Option<OwnerId>;
}

/// Handle for deregistering an identity-change callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(Option<OwnerId>) + Send + Sync>;

#[derive(Default)]
struct SessionState {
    current: Option<OwnerId>,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

/// A session-scoped identity provider.
///
/// Wraps whatever the auth collaborator reports: `sign_in` is called with
/// the identity it resolved, `sign_out` when the session ends. Subscribers
/// are notified after the change is applied, outside the internal lock, so
/// a callback may call back into the provider.
#[derive(Default)]
pub struct SessionIdentity {
    state: Mutex<SessionState>,
}

impl SessionIdentity {
    /// An anonymous session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that starts signed in (for tests and restored sessions).
    #[must_use]
    pub fn signed_in(owner: OwnerId) -> Self {
        let identity = Self::new();
        identity.sign_in(owner);
        identity
    }

    /// Records a sign-in and notifies subscribers if the identity changed.
    pub fn sign_in(&self, owner: OwnerId) {
        self.set(Some(owner));
    }

    /// Records a sign-out and notifies subscribers if anyone was signed in.
    pub fn sign_out(&self) {
        self.set(None);
    }

    fn set(&self, owner: Option<OwnerId>) {
        let to_notify: Vec<Callback> = {
            let mut state = self.state.lock().unwrap();
            if state.current == owner {
                return;
            }
            state.current = owner;
            state.subscribers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        for callback in to_notify {
            callback(owner);
        }
    }

    /// Registers a callback invoked on every identity change.
    pub fn on_identity_change(
        &self,
        callback: impl Fn(Option<OwnerId>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut state = self.state.lock().unwrap();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Deregisters a callback. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.state.lock().unwrap();
        state.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }
}

impl IdentityProvider for SessionIdentity {
    fn current(&self) -> Option<OwnerId> {
        self.state.lock().unwrap().current
    }
}
