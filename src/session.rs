//! Per-browser sessions and the in-memory store of their datasets.

use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use uuid::Uuid;

use crate::{Error, report::Dataset};

/// The name of the cookie that holds the session ID.
pub(crate) const SESSION_COOKIE: &str = "session_id";

/// Identifies one browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Get the session ID from `jar`, or start a new session if the cookie is
/// missing or malformed.
///
/// Returns the jar to send back with the response. It has the session cookie
/// added if a new session was started.
pub(crate) fn get_or_create_session(jar: CookieJar) -> (CookieJar, SessionId) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<SessionId>().ok());

    match existing {
        Some(session_id) => (jar, session_id),
        None => {
            let session_id = SessionId::new();
            tracing::debug!("Starting new session {session_id}");

            let jar = jar.add(
                Cookie::build((SESSION_COOKIE, session_id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            );

            (jar, session_id)
        }
    }
}

/// How long a session's upload is kept after it was last used.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
struct SessionEntry {
    dataset: Dataset,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_stale(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > idle_timeout
    }
}

/// The dataset of every session that has uploaded a file.
///
/// Sessions that are not in the store see the sample data. Uploads that have
/// not been used for longer than the idle timeout are dropped, and their
/// session goes back to the sample data.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<SessionId, SessionEntry>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// A copy of the dataset for `session_id`.
    ///
    /// # Errors
    /// Returns [Error::SessionLockError] if the lock is poisoned.
    pub fn dataset(&self, session_id: SessionId) -> Result<Dataset, Error> {
        self.dataset_at(session_id, Instant::now())
    }

    fn dataset_at(&self, session_id: SessionId, now: Instant) -> Result<Dataset, Error> {
        let mut entries = self.lock()?;

        let Some(entry) = entries.get_mut(&session_id) else {
            return Ok(Dataset::sample());
        };

        if entry.is_stale(now, self.idle_timeout) {
            tracing::debug!("Session {session_id} expired, showing the sample data");
            entries.remove(&session_id);
            return Ok(Dataset::sample());
        }

        entry.last_seen = now;
        Ok(entry.dataset.clone())
    }

    /// Replace the dataset for `session_id`.
    ///
    /// Expired sessions are removed first.
    ///
    /// # Errors
    /// Returns [Error::SessionLockError] if the lock is poisoned.
    pub fn replace(&self, session_id: SessionId, dataset: Dataset) -> Result<(), Error> {
        self.replace_at(session_id, dataset, Instant::now())
    }

    fn replace_at(
        &self,
        session_id: SessionId,
        dataset: Dataset,
        now: Instant,
    ) -> Result<(), Error> {
        let mut entries = self.lock()?;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(now, self.idle_timeout));
        let expired = before - entries.len();
        if expired > 0 {
            tracing::debug!("Removed {expired} expired sessions");
        }

        entries.insert(
            session_id,
            SessionEntry {
                dataset,
                last_seen: now,
            },
        );

        Ok(())
    }

    /// Go back to the sample data for `session_id`.
    ///
    /// # Errors
    /// Returns [Error::SessionLockError] if the lock is poisoned.
    pub fn reset(&self, session_id: SessionId) -> Result<(), Error> {
        self.lock()?.remove(&session_id);

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionEntry>>, Error> {
        self.entries
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire session lock: {error}"))
            .map_err(|_| Error::SessionLockError)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use axum_extra::extract::{CookieJar, cookie::Cookie};
    use time::macros::date;

    use crate::{
        report::{DataSource, Dataset},
        transaction::Transaction,
    };

    use super::{SESSION_COOKIE, SessionId, SessionStore, get_or_create_session};

    fn uploaded_dataset() -> Dataset {
        Dataset {
            source: DataSource::Sample,
            transactions: vec![Transaction::new(
                date!(2024 - 01 - 10),
                "Flipkart",
                150.0,
                "Shopping",
            )],
        }
    }

    #[test]
    fn new_session_sets_cookie() {
        let (jar, session_id) = get_or_create_session(CookieJar::new());

        let cookie = jar.get(SESSION_COOKIE).expect("session cookie not set");
        assert_eq!(cookie.value(), session_id.to_string());
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn existing_session_is_reused() {
        let session_id = SessionId::new();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()));

        let (_, got) = get_or_create_session(jar);

        assert_eq!(got, session_id);
    }

    #[test]
    fn malformed_cookie_starts_new_session() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid"));

        let (jar, session_id) = get_or_create_session(jar);

        assert_eq!(
            jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_owned()),
            Some(session_id.to_string())
        );
    }

    #[test]
    fn unknown_session_sees_sample() {
        let store = SessionStore::new();

        let dataset = store.dataset(SessionId::new()).unwrap();

        assert_eq!(dataset, Dataset::sample());
    }

    #[test]
    fn replace_then_reset() {
        let store = SessionStore::new();
        let session_id = SessionId::new();

        store.replace(session_id, uploaded_dataset()).unwrap();
        assert_eq!(store.dataset(session_id).unwrap(), uploaded_dataset());

        store.reset(session_id).unwrap();
        assert_eq!(store.dataset(session_id).unwrap(), Dataset::sample());
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        let session_id = SessionId::new();
        let other_session = SessionId::new();

        store.replace(session_id, uploaded_dataset()).unwrap();

        assert_eq!(store.dataset(other_session).unwrap(), Dataset::sample());
    }

    #[test]
    fn idle_session_falls_back_to_sample() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let session_id = SessionId::new();
        let uploaded_at = Instant::now();

        store
            .replace_at(session_id, uploaded_dataset(), uploaded_at)
            .unwrap();

        let later = uploaded_at + Duration::from_secs(30);
        assert_eq!(
            store.dataset_at(session_id, later).unwrap(),
            uploaded_dataset()
        );

        let much_later = later + Duration::from_secs(61);
        assert_eq!(
            store.dataset_at(session_id, much_later).unwrap(),
            Dataset::sample()
        );
        assert!(store.lock().unwrap().is_empty());
    }

    #[test]
    fn using_a_session_keeps_it_alive() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let session_id = SessionId::new();
        let start = Instant::now();

        store.replace_at(session_id, uploaded_dataset(), start).unwrap();

        for minute in 1..=5 {
            let now = start + Duration::from_secs(50 * minute);
            assert_eq!(
                store.dataset_at(session_id, now).unwrap(),
                uploaded_dataset()
            );
        }
    }

    #[test]
    fn uploads_remove_expired_sessions() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();

        for _ in 0..3 {
            store
                .replace_at(SessionId::new(), uploaded_dataset(), start)
                .unwrap();
        }
        assert_eq!(store.lock().unwrap().len(), 3);

        let new_session = SessionId::new();
        store
            .replace_at(
                new_session,
                uploaded_dataset(),
                start + Duration::from_secs(120),
            )
            .unwrap();

        let entries = store.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key(&new_session));
    }
}
