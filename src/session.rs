use crate::storage::{SessionStore, StorageError};

/// Storage key holding the backend-issued session token
pub const SESSION_KEY: &str = "chat_session_id";

/// The visitor's session with the chat backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
}

impl Session {
    /// Load whatever token a previous run left behind. Surrounding whitespace
    /// is trimmed. Read failures and blank values both mean "no session yet".
    pub fn load(store: &dyn SessionStore) -> Self {
        match store.get_item(SESSION_KEY) {
            Ok(id) => Self {
                id: id
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty()),
            },
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session id");
                Self::default()
            }
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Adopt a token issued by the backend, overwriting any previous one.
    ///
    /// The in-memory id is updated even when the write fails.
    pub fn adopt(&mut self, id: &str, store: &mut dyn SessionStore) -> Result<(), StorageError> {
        self.id = Some(id.to_string());
        store.set_item(SESSION_KEY, id)
    }

    pub fn clear(&mut self, store: &mut dyn SessionStore) -> Result<(), StorageError> {
        self.id = None;
        store.remove_item(SESSION_KEY)
    }
}
