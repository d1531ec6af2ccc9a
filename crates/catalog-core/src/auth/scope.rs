use super::{AuthError, Session, SessionStore};

/// Provisioning scope for the session store.
///
/// The application root builds a provided scope around the store it owns and
/// hands it to every component while rendering or reacting. Components never
/// hold a store of their own.
#[derive(Clone, Copy)]
pub struct SessionScope<'a> {
    store: Option<&'a SessionStore>,
}

impl<'a> SessionScope<'a> {
    pub fn provided(store: &'a SessionStore) -> Self {
        Self { store: Some(store) }
    }

    /// A scope with no store behind it.
    pub fn detached() -> Self {
        Self { store: None }
    }

    pub fn try_session(&self) -> Result<&'a SessionStore, AuthError> {
        self.store.ok_or(AuthError::OutsideProvider)
    }

    /// The provided store.
    ///
    /// # Panics
    ///
    /// Panics when the scope is detached. Reaching for the session outside
    /// a provider is a wiring bug, not a runtime condition.
    pub fn session(&self) -> &'a SessionStore {
        match self.store {
            Some(store) => store,
            None => panic!("session store used outside of a session provider"),
        }
    }

    /// Shorthand for `session().read()`.
    pub fn read(&self) -> Session {
        self.session().read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::tests::store_with;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_provided_scope_reads_store() {
        let (store, _) = store_with(MemoryStorage::new());
        store.initialize();
        store.login("abc").unwrap();
        let scope = SessionScope::provided(&store);
        assert_eq!(scope.read().token(), Some("abc"));
        assert!(scope.try_session().is_ok());
    }

    #[test]
    fn test_detached_scope_reports_misuse() {
        let scope = SessionScope::detached();
        assert_eq!(scope.try_session().err(), Some(AuthError::OutsideProvider));
    }

    #[test]
    #[should_panic(expected = "outside of a session provider")]
    fn test_detached_scope_read_panics() {
        SessionScope::detached().read();
    }
}
