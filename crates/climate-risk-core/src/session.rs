//! Caller-scoped facility sets ("partner sessions"), keyed by opaque UUID
//! with a two-hour sliding TTL. Expired and unknown ids are
//! indistinguishable to callers. Reads hand out cloned snapshots, so a
//! concurrent delete can never corrupt an in-flight analysis.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::ConfigRegistry;
use crate::error::ClimateRiskError;
use crate::types::Facility;
use crate::ClimateRiskResult;

/// Sessions idle longer than this are reaped.
pub const SESSION_TTL_SECS: i64 = 2 * 3600;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
    pub facilities: Vec<Facility>,
}

pub struct SessionStore {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    inner: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        SessionStore {
            clock,
            ttl: Duration::seconds(SESSION_TTL_SECS),
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Validate and store a facility set. Returns the opaque session id and
    /// any unknown-sector warnings; unknown sectors are accepted.
    pub fn create(
        &self,
        registry: &ConfigRegistry,
        company_name: &str,
        facilities: Vec<Facility>,
    ) -> ClimateRiskResult<(Uuid, Vec<String>)> {
        if company_name.trim().is_empty() {
            return Err(ClimateRiskError::InvalidInput {
                field: "company_name".into(),
                reason: "Company name must not be empty.".into(),
            });
        }
        let warnings = registry.validate_facilities(&facilities)?;
        let now = self.clock.now();
        let id = Uuid::new_v4();
        let session = Session {
            id,
            company_name: company_name.to_string(),
            created_at: now,
            last_access: now,
            facilities,
        };
        self.inner.write().insert(id, session);
        tracing::debug!(session = %id, "partner session created");
        Ok((id, warnings))
    }

    /// Snapshot of a live session. Refreshes the sliding TTL and lazily
    /// reaps anything already expired.
    pub fn get(&self, id: Uuid) -> ClimateRiskResult<Session> {
        let now = self.clock.now();
        let mut inner = self.inner.write();
        Self::reap(&mut inner, now, self.ttl);
        match inner.get_mut(&id) {
            Some(session) => {
                session.last_access = now;
                Ok(session.clone())
            }
            None => Err(ClimateRiskError::SessionNotFound),
        }
    }

    /// Refresh the TTL without reading the facility set.
    pub fn touch(&self, id: Uuid) -> ClimateRiskResult<()> {
        self.get(id).map(|_| ())
    }

    pub fn delete(&self, id: Uuid) -> ClimateRiskResult<()> {
        let now = self.clock.now();
        let mut inner = self.inner.write();
        Self::reap(&mut inner, now, self.ttl);
        match inner.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ClimateRiskError::SessionNotFound),
        }
    }

    pub fn list_facilities(&self, id: Uuid) -> ClimateRiskResult<Vec<Facility>> {
        self.get(id).map(|s| s.facilities)
    }

    /// Periodic sweep; returns the number of sessions reaped.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.write();
        let before = inner.len();
        Self::reap(&mut inner, now, self.ttl);
        before - inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    fn reap(inner: &mut HashMap<Uuid, Session>, now: DateTime<Utc>, ttl: Duration) {
        inner.retain(|_, session| now - session.last_access <= ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_clock::ManualClock;
    use pretty_assertions::assert_eq;

    fn setup() -> (SessionStore, Arc<ManualClock>, ConfigRegistry) {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let store = SessionStore::new(clock.clone());
        (store, clock, ConfigRegistry::builtin())
    }

    fn one_facility(reg: &ConfigRegistry) -> Vec<Facility> {
        vec![reg.seed_facilities()[0].clone()]
    }

    #[test]
    fn test_create_returns_uuid_v4() {
        let (store, _, reg) = setup();
        let (a, warnings) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        let (b, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        assert!(warnings.is_empty());
        assert_ne!(a, b);
        // 36-character hyphenated form.
        assert_eq!(a.to_string().len(), 36);
    }

    #[test]
    fn test_get_returns_stored_facilities() {
        let (store, _, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        let session = store.get(id).unwrap();
        assert_eq!(session.company_name, "Partner Co");
        assert_eq!(session.facilities.len(), 1);
        assert_eq!(session.facilities[0].id, reg.seed_facilities()[0].id);
    }

    #[test]
    fn test_unknown_id_not_found() {
        let (store, _, _) = setup();
        let err = store.get(Uuid::new_v4()).unwrap_err();
        match err {
            ClimateRiskError::SessionNotFound => {}
            other => panic!("Expected SessionNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_session_expires_after_two_idle_hours() {
        let (store, clock, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        assert!(store.get(id).is_ok());
        clock.advance(Duration::minutes(121));
        let err = store.get(id).unwrap_err();
        assert!(matches!(err, ClimateRiskError::SessionNotFound));
    }

    #[test]
    fn test_ttl_slides_on_access() {
        let (store, clock, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        clock.advance(Duration::minutes(60));
        assert!(store.get(id).is_ok(), "one idle hour is within TTL");
        clock.advance(Duration::minutes(60));
        // Two hours since create, one since last access: still alive.
        assert!(store.get(id).is_ok());
        clock.advance(Duration::minutes(121));
        assert!(store.get(id).is_err());
    }

    #[test]
    fn test_touch_refreshes_without_reading() {
        let (store, clock, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        clock.advance(Duration::minutes(110));
        store.touch(id).unwrap();
        clock.advance(Duration::minutes(110));
        assert!(store.get(id).is_ok(), "touch must reset the idle clock");
    }

    #[test]
    fn test_exact_ttl_boundary_survives() {
        let (store, clock, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        clock.advance(Duration::minutes(120));
        assert!(store.get(id).is_ok(), "age == TTL is not yet expired");
    }

    #[test]
    fn test_delete_then_get_not_found() {
        let (store, _, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        store.delete(id).unwrap();
        assert!(store.get(id).is_err());
        // Double delete reads the same as never-existed.
        assert!(matches!(store.delete(id).unwrap_err(), ClimateRiskError::SessionNotFound));
    }

    #[test]
    fn test_snapshot_survives_concurrent_delete() {
        let (store, _, reg) = setup();
        let (id, _) = store.create(&reg, "Partner Co", one_facility(&reg)).unwrap();
        let snapshot = store.get(id).unwrap();
        store.delete(id).unwrap();
        // The cloned snapshot is unaffected by the delete.
        assert_eq!(snapshot.facilities.len(), 1);
    }

    #[test]
    fn test_sweep_reaps_only_expired() {
        let (store, clock, reg) = setup();
        let (old, _) = store.create(&reg, "Old Co", one_facility(&reg)).unwrap();
        clock.advance(Duration::minutes(90));
        let (fresh, _) = store.create(&reg, "Fresh Co", one_facility(&reg)).unwrap();
        clock.advance(Duration::minutes(45)); // old is now 135 min idle
        assert_eq!(store.sweep(), 1);
        assert!(store.get(old).is_err());
        assert!(store.get(fresh).is_ok());
    }

    #[test]
    fn test_unknown_sector_upload_accepted_with_warning() {
        let (store, _, reg) = setup();
        let mut facility = reg.seed_facilities()[0].clone();
        facility.sector = "quantum_computing".into();
        let (_, warnings) = store.create(&reg, "Partner Co", vec![facility]).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("quantum_computing"));
    }

    #[test]
    fn test_invalid_facility_rejected() {
        let (store, _, reg) = setup();
        let mut facility = reg.seed_facilities()[0].clone();
        facility.longitude = 700.0;
        assert!(store.create(&reg, "Partner Co", vec![facility]).is_err());
    }

    #[test]
    fn test_empty_company_name_rejected() {
        let (store, _, reg) = setup();
        let err = store.create(&reg, "  ", one_facility(&reg)).unwrap_err();
        match err {
            ClimateRiskError::InvalidInput { field, .. } => assert_eq!(field, "company_name"),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }
}
