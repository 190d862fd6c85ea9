use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::{validate_name, PlanStore, PlanSummary, SavedPlan};
use crate::errors::PlanError;
use crate::model::MealPlan;
use crate::profile::Profile;

/// Durable backend over a single SQLite table. Profile and plan are stored
/// as JSON text, matching the reference server's schema.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS meal_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    user_profile TEXT NOT NULL,
    plan_data TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, PlanError> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, PlanError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, PlanError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, PlanError> {
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| PlanError::Store(format!("bad created_at {text:?}: {e}")))
}

impl PlanStore for SqliteStore {
    fn save(&self, name: &str, profile: &Profile, plan: &MealPlan) -> Result<i64, PlanError> {
        validate_name(name)?;
        let profile_json =
            serde_json::to_string(profile).map_err(|e| PlanError::Store(e.to_string()))?;
        let plan_json = serde_json::to_string(plan).map_err(|e| PlanError::Store(e.to_string()))?;
        let created_at = Utc::now().to_rfc3339();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO meal_plans (name, user_profile, plan_data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, profile_json, plan_json, created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list(&self) -> Result<Vec<PlanSummary>, PlanError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM meal_plans ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, created_at) = row?;
            out.push(PlanSummary {
                id,
                name,
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(out)
    }

    fn load(&self, id: i64) -> Result<Option<SavedPlan>, PlanError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, name, user_profile, plan_data, created_at
                 FROM meal_plans WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, name, profile_json, plan_json, created_at)) => {
                let user_profile: Profile = serde_json::from_str(&profile_json)
                    .map_err(|e| PlanError::Store(format!("corrupt profile for {id}: {e}")))?;
                let plan_data: MealPlan = serde_json::from_str(&plan_json)
                    .map_err(|e| PlanError::Store(format!("corrupt plan for {id}: {e}")))?;
                Ok(Some(SavedPlan {
                    id,
                    name,
                    user_profile,
                    plan_data,
                    created_at: parse_timestamp(&created_at)?,
                }))
            }
        }
    }

    fn delete(&self, id: i64) -> Result<(), PlanError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM meal_plans WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[test]
    fn satisfies_the_store_contract() {
        let store = SqliteStore::open_in_memory().unwrap();
        contract::exercise(&store);
    }

    #[test]
    fn survives_reopen_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plans.db");
        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store
                .save("Week A", &contract::sample_profile(), &contract::sample_plan())
                .unwrap()
        };
        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load(id).unwrap().expect("plan persisted");
        assert_eq!(loaded.name, "Week A");
    }
}
