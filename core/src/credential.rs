//! Shared, replaceable API token.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Handle to the bearer token used for outgoing requests.
///
/// Clones share the same slot: `NukiClient` writes it, `AuthMiddleware` reads
/// it when each request passes through. A call in flight keeps whatever
/// value it read; concurrent writers are last-write-wins.
#[derive(Clone, Default)]
pub struct Credential(Arc<RwLock<Option<String>>>);

impl Credential {
    pub fn new(token: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(token)))
    }

    /// Snapshot of the current token.
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn is_set(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

// Never print the token itself.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_set() { "set" } else { "unset" };
        f.debug_tuple("Credential").field(&state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_slot() {
        let a = Credential::new(None);
        let b = a.clone();
        a.set(Some("token-a".into()));
        assert_eq!(b.get().as_deref(), Some("token-a"));
        b.set(None);
        assert!(!a.is_set());
    }

    #[test]
    fn debug_hides_token() {
        let credential = Credential::new(Some("secret".into()));
        let rendered = format!("{credential:?}");
        assert_eq!(rendered, "Credential(\"set\")");
        assert!(!rendered.contains("secret"));
    }
}
