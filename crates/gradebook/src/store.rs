//! In-memory gradebook snapshots, keyed by user.

use crate::grades::{GradeError, GradebookSnapshot, Semester};
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// No snapshot has been stored for this user
    #[error("No gradebook found for user {user_id}")]
    UserNotFound { user_id: String },

    #[error("Semester {semester_id} not found")]
    SemesterNotFound { semester_id: String },

    /// The snapshot holds a semester owned by someone else
    #[error("Semester {semester_id} does not belong to user {user_id}")]
    Forbidden { user_id: String, semester_id: String },

    #[error("Invalid gradebook: {0}")]
    Invalid(#[from] GradeError),
}

impl StoreError {
    /// Returns true if this error means the resource doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UserNotFound { .. } | StoreError::SemesterNotFound { .. }
        )
    }
}

/// Thread-safe snapshot store.
///
/// Uses DashMap for concurrent access without external locking.
#[derive(Default)]
pub struct GradebookStore {
    snapshots: DashMap<String, GradebookSnapshot>,
}

impl GradebookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a user's snapshot, replacing any previous one.
    ///
    /// Every semester in the snapshot must be owned by `user_id`.
    pub fn put_snapshot(&self, user_id: &str, snapshot: GradebookSnapshot) -> Result<(), StoreError> {
        snapshot.validate()?;

        if let Some(foreign) = snapshot.semesters.iter().find(|s| s.user_id != user_id) {
            warn!(
                "Rejected snapshot for {}: semester {} is owned by {}",
                user_id, foreign.id, foreign.user_id
            );
            return Err(StoreError::Forbidden {
                user_id: user_id.to_string(),
                semester_id: foreign.id.clone(),
            });
        }

        debug!(
            "Storing gradebook for {} ({} semesters)",
            user_id,
            snapshot.semesters.len()
        );
        self.snapshots.insert(user_id.to_string(), snapshot);
        Ok(())
    }

    /// Gets a copy of a user's snapshot.
    pub fn snapshot(&self, user_id: &str) -> Result<GradebookSnapshot, StoreError> {
        self.snapshots
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }

    /// Looks up one semester of the user.
    ///
    /// Only the user's own snapshot is searched, and `put_snapshot` guarantees it
    /// holds no foreign semesters.
    pub fn semester(&self, user_id: &str, semester_id: &str) -> Result<Semester, StoreError> {
        self.snapshot(user_id)?
            .semesters
            .into_iter()
            .find(|s| s.id == semester_id)
            .ok_or_else(|| StoreError::SemesterNotFound {
                semester_id: semester_id.to_string(),
            })
    }

    /// Removes a user's snapshot. Returns true if one existed.
    pub fn remove(&self, user_id: &str) -> bool {
        self.snapshots.remove(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
