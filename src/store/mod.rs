//! Schedule store service.
//!
//! Holds the in-memory [`ScheduleBook`] and writes the whole book to its
//! storage slot after every change. Mutations run on a copy that is only
//! swapped in once the write succeeded, so a failed write changes nothing.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{EmployeeSchedule, Roster, ScheduleBook, StatusChange, WorkStatus};

pub struct ScheduleStore {
    repo: Repository,
    roster: Arc<Roster>,
    storage_key: String,
    book: RwLock<ScheduleBook>,
}

impl ScheduleStore {
    /// Read the storage slot once and reconcile it with the roster.
    /// A missing or unreadable slot starts a fresh, empty book.
    pub async fn load(
        repo: Repository,
        roster: Arc<Roster>,
        storage_key: &str,
    ) -> Result<Self, AppError> {
        let book = match repo.load_slot(storage_key).await? {
            Some(raw) => match serde_json::from_str::<Vec<EmployeeSchedule>>(&raw) {
                Ok(persisted) => ScheduleBook::reconcile(&roster, persisted),
                Err(e) => {
                    tracing::warn!(
                        "Stored schedules under {} are unreadable, starting fresh: {}",
                        storage_key,
                        e
                    );
                    ScheduleBook::empty(&roster)
                }
            },
            None => ScheduleBook::empty(&roster),
        };

        Ok(Self {
            repo,
            roster,
            storage_key: storage_key.to_string(),
            book: RwLock::new(book),
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Copy of the current book for read-only computations.
    pub async fn snapshot(&self) -> ScheduleBook {
        self.book.read().await.clone()
    }

    pub async fn get_status(&self, employee_id: &str, date: NaiveDate) -> WorkStatus {
        self.book.read().await.status(employee_id, date)
    }

    /// Upsert one entry. The flag is `false` for unknown employees.
    pub async fn set_status(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: WorkStatus,
    ) -> Result<(bool, i64), AppError> {
        self.mutate(|book| book.set_status(employee_id, date, status))
            .await
    }

    /// Office/remote quick toggle; `None` for unknown employees.
    pub async fn toggle_status(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<(Option<WorkStatus>, i64), AppError> {
        self.mutate(|book| book.toggle_status(employee_id, date))
            .await
    }

    /// Revert `dates` to the OFFICE default for the given employees, or all.
    pub async fn clear_range(
        &self,
        employee_ids: Option<&[String]>,
        dates: &[NaiveDate],
    ) -> Result<(usize, i64), AppError> {
        self.mutate(|book| book.clear_range(employee_ids, dates))
            .await
    }

    /// Apply a whole change set in one write, or nothing at all.
    pub async fn apply_changes(&self, changes: &[StatusChange]) -> Result<(usize, i64), AppError> {
        self.mutate(|book| book.apply(changes)).await
    }

    /// Run `f` on a copy of the book and persist it. The write lock is held
    /// until the copy is swapped in so writes land in mutation order.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut ScheduleBook) -> T,
    ) -> Result<(T, i64), AppError> {
        let mut guard = self.book.write().await;
        let mut next = guard.clone();
        let result = f(&mut next);

        if next == *guard {
            let revision_id = self.repo.get_revision_id().await?;
            return Ok((result, revision_id));
        }

        let raw = serde_json::to_string(next.schedules())
            .map_err(|e| AppError::Internal(format!("Failed to serialize schedules: {}", e)))?;
        let revision_id = self.repo.save_slot(&self.storage_key, &raw).await?;
        *guard = next;

        tracing::debug!("Persisted schedules at revision {}", revision_id);
        Ok((result, revision_id))
    }
}
