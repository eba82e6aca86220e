// ── Session state ──
//
// The signed-in identity lives in one `SessionContext`, shared by every
// service. Writes go through a `SessionStore` so a login survives the
// process; readers observe changes through a `watch` channel.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sensordesk_api::AuthHeaders;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::User;

/// An authenticated identity.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: User,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: SecretString, user: User) -> Self {
        Self {
            token,
            user,
            issued_at: Utc::now(),
        }
    }

    /// Headers for the user endpoints, acting as this session's user.
    pub fn auth_headers(&self) -> AuthHeaders {
        AuthHeaders {
            token: self.token.clone(),
            admin: self.user.role.is_admin(),
            uuid: Some(self.user.uuid.clone()),
        }
    }
}

// ── Persistence ──────────────────────────────────────────────────────

/// Where a session is kept between runs.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// The stored session, if any.
    fn load(&self) -> Result<Option<Session>, CoreError>;

    fn save(&self, session: &Session) -> Result<(), CoreError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>, CoreError> {
        self.slot
            .lock()
            .map_err(|_| CoreError::Internal("session store lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// On-disk shape of a session. The token is only exposed here.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    user: User,
    issued_at: DateTime<Utc>,
}

/// JSON file store, e.g. `~/.local/share/sensordesk/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let persisted: PersistedSession =
            serde_json::from_str(&raw).map_err(|e| CoreError::Session {
                message: format!("corrupt session file {}: {e}", self.path.display()),
            })?;
        Ok(Some(Session {
            token: SecretString::from(persisted.token),
            user: persisted.user,
            issued_at: persisted.issued_at,
        }))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let persisted = PersistedSession {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
            issued_at: session.issued_at,
        };
        let json = serde_json::to_string_pretty(&persisted).map_err(|e| CoreError::Session {
            message: e.to_string(),
        })?;
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // A file left by an older build may carry wider permissions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Context ──────────────────────────────────────────────────────────

/// Shared, observable session state.
///
/// Cheaply cloneable. All clones see the same session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Box<dyn SessionStore>,
    tx: watch::Sender<Option<Session>>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &self.inner.store)
            .field("signed_in", &self.inner.tx.borrow().is_some())
            .finish()
    }
}

impl SessionContext {
    /// An empty context over `store`. The store is not read.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self::with_initial(Box::new(store), None)
    }

    /// A context that keeps nothing beyond the process.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// A context seeded from whatever `store` holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    pub fn restore(store: impl SessionStore + 'static) -> Self {
        let initial = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                None
            }
        };
        if let Some(session) = &initial {
            debug!(user = %session.user.email, "session restored");
        }
        Self::with_initial(Box::new(store), initial)
    }

    fn with_initial(store: Box<dyn SessionStore>, initial: Option<Session>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionInner { store, tx }),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.tx.borrow().is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn auth_headers(&self) -> Option<AuthHeaders> {
        self.inner.tx.borrow().as_ref().map(Session::auth_headers)
    }

    /// Persist `session` and make it current.
    ///
    /// Nothing changes if the store rejects it.
    pub fn set(&self, session: Session) -> Result<(), CoreError> {
        self.inner.store.save(&session)?;
        self.inner.tx.send_replace(Some(session));
        Ok(())
    }

    /// Drop the current session, in memory first, then in the store.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.inner.tx.send_replace(None);
        self.inner.store.clear()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn sample_session() -> Session {
        Session::new(
            SecretString::from("tok-123".to_string()),
            User {
                uuid: "u-1".into(),
                name: "Ana".into(),
                email: "ana@x.com".into(),
                phone: "+351900000000".into(),
                picture: None,
                role: Role::Admin,
            },
        )
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        assert!(store.load().unwrap().is_none());

        store.save(&sample_session()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token.expose_secret(), "tok-123");
        assert_eq!(loaded.user.uuid, "u-1");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh.json");
        FileSessionStore::new(&fresh).save(&sample_session()).unwrap();
        let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let stale = dir.path().join("stale.json");
        std::fs::write(&stale, "{}").unwrap();
        std::fs::set_permissions(&stale, std::fs::Permissions::from_mode(0o644)).unwrap();
        FileSessionStore::new(&stale).save(&sample_session()).unwrap();
        let mode = std::fs::metadata(&stale).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(FileSessionStore::new(&stale).load().unwrap().is_some());
    }

    #[test]
    fn corrupt_file_restores_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(FileSessionStore::new(&path).load().is_err());
        let ctx = SessionContext::restore(FileSessionStore::new(&path));
        assert!(!ctx.is_signed_in());
    }

    #[test]
    fn restore_reads_what_set_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let ctx = SessionContext::new(FileSessionStore::new(&path));
        ctx.set(sample_session()).unwrap();

        let fresh = SessionContext::restore(FileSessionStore::new(&path));
        assert_eq!(fresh.user().unwrap().email, "ana@x.com");

        fresh.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn headers_follow_the_session() {
        let ctx = SessionContext::in_memory();
        assert!(ctx.auth_headers().is_none());

        ctx.set(sample_session()).unwrap();
        let headers = ctx.auth_headers().unwrap();
        assert!(headers.admin);
        assert_eq!(headers.uuid.as_deref(), Some("u-1"));
        assert_eq!(headers.token.expose_secret(), "tok-123");
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let ctx = SessionContext::in_memory();
        let mut rx = ctx.subscribe();

        ctx.set(sample_session()).unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        ctx.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
