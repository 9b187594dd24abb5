// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local SQLite store for daily metrics and the goals singleton.
//!
//! Tables:
//! - `fitness_data`: one row per calendar date (unique), replaced on rewrite
//! - `goals`: a single row with id 1, seeded with the default goals
//!
//! Every operation opens its own connection and drops it before returning,
//! so no handle outlives the call on any exit path.

use crate::db::StoreError;
use crate::models::{DailyEntry, DailyMetrics, Goals};
use crate::time_utils::today;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "fitness_tracker.db";

const SCHEMA_VERSION: i64 = 1;
const GOALS_ROW_ID: i64 = 1;
/// Rows fetched per round trip when walking the history.
const HISTORY_PAGE_SIZE: usize = 64;

type StoreResult<T> = Result<T, StoreError>;

/// Handle to the local metrics database.
///
/// Cheap to clone; holds only the file path.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open (creating if needed) the database at `path` and bring the
    /// schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { path };
        store.migrate()?;
        tracing::info!(path = %store.path.display(), "Local store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    fn migrate(&self) -> StoreResult<()> {
        let conn = self.connection()?;
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < SCHEMA_VERSION {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS fitness_data (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL UNIQUE,
                    steps INTEGER NOT NULL DEFAULT 0,
                    calories INTEGER NOT NULL DEFAULT 0,
                    active_time INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS goals (
                    id INTEGER PRIMARY KEY,
                    goal_steps INTEGER NOT NULL,
                    goal_calories INTEGER NOT NULL,
                    goal_active_time INTEGER NOT NULL
                );",
            )?;
            insert_default_goals(&conn)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tracing::debug!(from = version, to = SCHEMA_VERSION, "Migrated local schema");
        }

        Ok(())
    }

    // ─── Daily Metrics ───────────────────────────────────────────

    /// Upsert today's record, replacing any earlier values for today.
    pub fn save_daily_data(&self, entry: DailyEntry) -> StoreResult<()> {
        self.save_daily_data_on(&entry.on(today()))
    }

    /// Upsert the record for `metrics.date` (used when restoring history).
    pub fn save_daily_data_on(&self, metrics: &DailyMetrics) -> StoreResult<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO fitness_data (date, steps, calories, active_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                metrics.date,
                metrics.steps,
                metrics.calories,
                metrics.active_time
            ],
        )?;
        tracing::debug!(date = %metrics.date, steps = metrics.steps, "Saved daily metrics");
        Ok(())
    }

    /// Today's record, if anything was saved today.
    pub fn get_today_data(&self) -> StoreResult<Option<DailyMetrics>> {
        self.get_daily_data(today())
    }

    pub fn get_daily_data(&self, date: NaiveDate) -> StoreResult<Option<DailyMetrics>> {
        let conn = self.connection()?;
        let metrics = conn
            .query_row(
                "SELECT date, steps, calories, active_time FROM fitness_data WHERE date = ?1",
                params![date],
                map_metrics_row,
            )
            .optional()?;
        Ok(metrics)
    }

    /// Lazily walk all records, most recent first.
    ///
    /// The sequence is finite; call again to restart from the newest date.
    pub fn history(&self) -> History {
        History {
            store: self.clone(),
            before: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// All records, most recent first.
    pub fn get_history(&self) -> StoreResult<Vec<DailyMetrics>> {
        self.history().collect()
    }

    fn history_page(&self, before: Option<NaiveDate>) -> StoreResult<Vec<DailyMetrics>> {
        let conn = self.connection()?;
        let limit = HISTORY_PAGE_SIZE as i64;

        let rows = match before {
            Some(date) => {
                let mut stmt = conn.prepare(
                    "SELECT date, steps, calories, active_time FROM fitness_data
                     WHERE date < ?1 ORDER BY date DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![date, limit], map_metrics_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT date, steps, calories, active_time FROM fitness_data
                     ORDER BY date DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], map_metrics_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(rows)
    }

    /// Zero today's counters without deleting the row (midnight rollover).
    pub fn reset_daily_data(&self) -> StoreResult<()> {
        let conn = self.connection()?;
        let updated = conn.execute(
            "UPDATE fitness_data SET steps = 0, calories = 0, active_time = 0 WHERE date = ?1",
            params![today()],
        )?;
        tracing::debug!(rows = updated, "Reset today's metrics");
        Ok(())
    }

    // ─── Goals ───────────────────────────────────────────────────

    /// Overwrite the goals singleton.
    pub fn save_goals(&self, goals: &Goals) -> StoreResult<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO goals (id, goal_steps, goal_calories, goal_active_time)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
               goal_steps = excluded.goal_steps,
               goal_calories = excluded.goal_calories,
               goal_active_time = excluded.goal_active_time",
            params![GOALS_ROW_ID, goals.steps, goals.calories, goals.active_time],
        )?;
        tracing::debug!(?goals, "Saved goals");
        Ok(())
    }

    /// The stored goals record, if present.
    pub fn get_goals(&self) -> StoreResult<Option<Goals>> {
        let conn = self.connection()?;
        let goals = conn
            .query_row(
                "SELECT goal_steps, goal_calories, goal_active_time FROM goals WHERE id = ?1",
                params![GOALS_ROW_ID],
                |row| Ok(Goals::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(goals)
    }

    /// Stored goals, or the defaults if the record is missing.
    pub fn goals_or_default(&self) -> StoreResult<Goals> {
        Ok(self.get_goals()?.unwrap_or_default())
    }

    pub fn get_steps_goal(&self) -> StoreResult<u32> {
        Ok(self.goals_or_default()?.steps)
    }

    pub fn get_caloric_goal(&self) -> StoreResult<u32> {
        Ok(self.goals_or_default()?.calories)
    }

    pub fn get_active_time_goal(&self) -> StoreResult<u32> {
        Ok(self.goals_or_default()?.active_time)
    }

    // ─── Wipe ────────────────────────────────────────────────────

    /// Delete every metrics and goals row, then reseed the default goals.
    ///
    /// Runs in one transaction: on failure nothing is committed, so the
    /// goals row from before the call is still there.
    pub fn clear_all_data(&self) -> StoreResult<()> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM fitness_data", [])?;
        tx.execute("DELETE FROM goals", [])?;
        insert_default_goals(&tx)?;
        tx.commit()?;

        tracing::info!(deleted, "Cleared local data");
        Ok(())
    }
}

fn insert_default_goals(conn: &Connection) -> rusqlite::Result<()> {
    let defaults = Goals::default();
    conn.execute(
        "INSERT OR IGNORE INTO goals (id, goal_steps, goal_calories, goal_active_time)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            GOALS_ROW_ID,
            defaults.steps,
            defaults.calories,
            defaults.active_time
        ],
    )?;
    Ok(())
}

fn map_metrics_row(row: &Row) -> rusqlite::Result<DailyMetrics> {
    Ok(DailyMetrics {
        date: row.get(0)?,
        steps: row.get(1)?,
        calories: row.get(2)?,
        active_time: row.get(3)?,
    })
}

/// Lazy, newest-first walk over the stored daily metrics.
///
/// Fetches a page at a time with a short-lived connection. After an error
/// the iterator yields that error once and then ends.
pub struct History {
    store: LocalStore,
    before: Option<NaiveDate>,
    buffer: VecDeque<DailyMetrics>,
    exhausted: bool,
}

impl Iterator for History {
    type Item = StoreResult<DailyMetrics>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            match self.store.history_page(self.before) {
                Ok(page) => {
                    self.exhausted = page.len() < HISTORY_PAGE_SIZE;
                    self.before = page.last().map(|m| m.date);
                    self.buffer.extend(page);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
