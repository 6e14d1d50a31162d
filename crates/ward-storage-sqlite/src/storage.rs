use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use ward_core::{
    now_ms, transition, Evidence, EvidenceRef, Incident, IncidentDraft, IncidentFilter,
    IncidentId, IncidentStatus, IssueKind, Location, Transition, WorkerId,
};
use ward_storage::{IncidentStore, StoreError};

/// Durable incident store over a single sqlite file.
///
/// The connection is mutexed, so transitions serialize; the conditional
/// `UPDATE ... WHERE status = expected` still carries the compare step so the
/// optimistic check holds even if the store ever grows a second connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("open sqlite db {}", db_path.display()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let init_sql = include_str!("../migrations/0001_init.sql");
        conn.execute_batch(init_sql)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_incident(r: &Row<'_>) -> rusqlite::Result<Incident> {
        let status_raw: String = r.get(6)?;
        let status = IncidentStatus::parse(&status_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown incident status: {status_raw}").into(),
            )
        })?;
        Ok(Incident {
            id: IncidentId(r.get(0)?),
            kind: IssueKind::new(r.get::<_, String>(1)?),
            severity: r.get(2)?,
            location: Location {
                lat: r.get(3)?,
                lng: r.get(4)?,
                address: r.get(5)?,
            },
            status,
            assigned_worker: r.get::<_, Option<String>>(7)?.map(WorkerId::new),
            evidence: Evidence {
                original: EvidenceRef::new(r.get::<_, String>(8)?),
                resolved: r.get::<_, Option<String>>(9)?.map(EvidenceRef::new),
            },
            audit_note: r.get(10)?,
            created_ms: r.get(11)?,
            last_transition_ms: r.get(12)?,
        })
    }
}

const INCIDENT_COLUMNS: &str = "id, kind, severity, lat, lng, address, status, assigned_worker, \
     original_image, resolved_image, audit_note, created_ms, last_transition_ms";

impl IncidentStore for SqliteStore {
    fn create(&self, draft: IncidentDraft) -> Result<Incident, StoreError> {
        let conn = self.conn.lock().unwrap();
        let now = now_ms();
        conn.execute(
            "INSERT INTO incidents(kind, severity, lat, lng, address, status, original_image, created_ms, last_transition_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?7)",
            params![
                draft.kind.as_str(),
                draft.severity,
                draft.location.lat,
                draft.location.lng,
                draft.location.address,
                draft.original.as_str(),
                now
            ],
        )
        .map_err(StoreError::backend)?;
        let id = IncidentId(conn.last_insert_rowid());
        Ok(draft.into_incident(id, now))
    }

    fn get(&self, id: IncidentId) -> Result<Incident, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id=?1"
            ))
            .map_err(StoreError::backend)?;
        let mut rows = stmt
            .query_map(params![id.0], |r| Self::row_to_incident(r))
            .map_err(StoreError::backend)?;
        match rows.next() {
            Some(row) => row.map_err(StoreError::backend),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {INCIDENT_COLUMNS} FROM incidents
                  WHERE (?1 IS NULL OR status = ?1)
                    AND (?2 IS NULL OR kind = ?2)
                    AND (?3 IS NULL OR assigned_worker = ?3)
                  ORDER BY id"
            ))
            .map_err(StoreError::backend)?;
        let rows = stmt
            .query_map(
                params![
                    filter.status.map(|s| s.as_str()),
                    filter.kind.as_ref().map(|k| k.as_str()),
                    filter.worker.as_ref().map(|w| w.as_str()),
                ],
                |r| Self::row_to_incident(r),
            )
            .map_err(StoreError::backend)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(StoreError::backend)?);
        }
        Ok(out)
    }

    fn compare_and_transition(
        &self,
        id: IncidentId,
        expected: IncidentStatus,
        t: &Transition,
    ) -> Result<Incident, StoreError> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction().map_err(StoreError::backend)?;

        let current = {
            let mut stmt = tx
                .prepare(&format!(
                    "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id=?1"
                ))
                .map_err(StoreError::backend)?;
            let mut rows = stmt
                .query_map(params![id.0], |r| Self::row_to_incident(r))
                .map_err(StoreError::backend)?;
            match rows.next() {
                Some(row) => row.map_err(StoreError::backend)?,
                None => return Err(StoreError::NotFound(id)),
            }
        };

        if current.status != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status,
            });
        }

        let next = transition::apply(&current, t, now_ms());
        let changed = tx
            .execute(
                "UPDATE incidents
                    SET status = ?1,
                        assigned_worker = ?2,
                        resolved_image = ?3,
                        audit_note = ?4,
                        last_transition_ms = ?5
                  WHERE id = ?6 AND status = ?7",
                params![
                    next.status.as_str(),
                    next.assigned_worker.as_ref().map(|w| w.as_str()),
                    next.evidence.resolved.as_ref().map(|e| e.as_str()),
                    next.audit_note,
                    next.last_transition_ms,
                    id.0,
                    expected.as_str()
                ],
            )
            .map_err(StoreError::backend)?;
        if changed == 0 {
            // Raced by another writer between read and update.
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: current.status,
            });
        }
        tx.commit().map_err(StoreError::backend)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ward_core::{EvidenceRef, IssueKind, Location, WorkerId};

    fn draft(kind: &str) -> IncidentDraft {
        IncidentDraft {
            kind: IssueKind::new(kind),
            severity: Some("medium".into()),
            location: Location {
                lat: 23.2599,
                lng: 77.4126,
                address: "MP Nagar".into(),
            },
            original: EvidenceRef::new(format!("{kind}_orig")),
        }
    }

    #[test]
    fn open_and_migrate() {
        let dir = tempdir().unwrap();
        let _ = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
    }

    #[test]
    fn create_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
        let created = store.create(draft("pothole")).unwrap();
        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched.kind, IssueKind::new("pothole"));
        assert_eq!(fetched.status, IncidentStatus::Pending);
        assert_eq!(fetched.severity.as_deref(), Some("medium"));
        assert_eq!(fetched.created_ms, created.created_ms);
        assert!(fetched.assigned_worker.is_none());
        assert!(fetched.evidence.resolved.is_none());
    }

    #[test]
    fn ids_increase_monotonically() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
        let a = store.create(draft("pothole")).unwrap();
        let b = store.create(draft("garbage")).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn transition_is_exclusive() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
        let a = store.create(draft("pothole")).unwrap();

        let won = store.compare_and_transition(
            a.id,
            IncidentStatus::Pending,
            &Transition::Assign {
                worker: WorkerId::new("w1"),
            },
        );
        assert!(won.is_ok());

        let lost = store.compare_and_transition(
            a.id,
            IncidentStatus::Pending,
            &Transition::Assign {
                worker: WorkerId::new("w2"),
            },
        );
        assert!(matches!(lost, Err(StoreError::Conflict { .. })));

        assert_eq!(
            store.get(a.id).unwrap().assigned_worker,
            Some(WorkerId::new("w1"))
        );
    }

    #[test]
    fn full_lifecycle_persists_each_step() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
        let a = store.create(draft("pothole")).unwrap();

        store
            .compare_and_transition(
                a.id,
                IncidentStatus::Pending,
                &Transition::Assign {
                    worker: WorkerId::new("w1"),
                },
            )
            .unwrap();
        store
            .compare_and_transition(
                a.id,
                IncidentStatus::Assigned,
                &Transition::Complete {
                    resolved: EvidenceRef::new("pothole_fixed"),
                },
            )
            .unwrap();

        let completed = store.get(a.id).unwrap();
        assert_eq!(completed.status, IncidentStatus::Completed);
        assert_eq!(
            completed.evidence.resolved,
            Some(EvidenceRef::new("pothole_fixed"))
        );

        store
            .compare_and_transition(
                a.id,
                IncidentStatus::Completed,
                &Transition::Reject {
                    note: Some("still sinking".into()),
                },
            )
            .unwrap();
        let reopened = store.get(a.id).unwrap();
        assert_eq!(reopened.status, IncidentStatus::Pending);
        assert!(reopened.evidence.resolved.is_none());
        assert!(reopened.assigned_worker.is_none());
        assert_eq!(reopened.audit_note.as_deref(), Some("REJECTED: still sinking"));
    }

    #[test]
    fn list_filters_match_sql_and_rust_paths() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("ward.db")).unwrap();
        let a = store.create(draft("pothole")).unwrap();
        store.create(draft("garbage")).unwrap();
        store
            .compare_and_transition(
                a.id,
                IncidentStatus::Pending,
                &Transition::Assign {
                    worker: WorkerId::new("w1"),
                },
            )
            .unwrap();

        let assigned = store
            .list(&IncidentFilter {
                status: Some(IncidentStatus::Assigned),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, a.id);

        let w1 = store
            .list(&IncidentFilter {
                worker: Some(WorkerId::new("w1")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(w1.len(), 1);

        let all = store.list(&IncidentFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
    }
}
