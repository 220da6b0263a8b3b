//! Repository contract shared by every backend.

use crate::models::Todo;
use crate::{Error, Result};
use std::fmt;

/// Uniform persistence contract over a single todo backend.
///
/// Backends differ in id type and generation strategy but expose the same
/// operations, so application code can treat them interchangeably. Absence
/// on a plain lookup is a normal outcome (`Ok(None)`), never a failure;
/// [`TodoStorage::fetch`] is the strict variant that fails with
/// [`Error::NotFound`] instead.
///
/// Adapters are stateless façades over their backend connection and may be
/// called concurrently; atomicity is whatever the backend guarantees for a
/// single read or write.
pub trait TodoStorage: Send + Sync {
    /// Backend identifier type.
    type Id: Clone + fmt::Debug + fmt::Display + Send + Sync;

    /// Inserts or updates a record, all-or-nothing.
    ///
    /// Returns the stored record with its id populated when the backend
    /// assigns one.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed for this backend or the
    /// write fails.
    fn save(&self, todo: &Todo<Self::Id>) -> Result<Todo<Self::Id>>;

    /// Point lookup by id.
    ///
    /// # Errors
    ///
    /// Returns an error only for a malformed id or an unreachable backend —
    /// a legitimate miss is `Ok(None)`.
    fn find_by_id(&self, id: &Self::Id) -> Result<Option<Todo<Self::Id>>>;

    /// Returns a snapshot of every live record.
    ///
    /// Ordering is backend-defined and not stable across calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn find_all(&self) -> Result<Vec<Todo<Self::Id>>>;

    /// Removes the record if present; removing an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete_by_id(&self, id: &Self::Id) -> Result<()>;

    /// Clears every record in the backend.
    ///
    /// Intended for lifecycle reset between independent units of work, not
    /// production traffic, and not atomic against concurrent saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete_all(&self) -> Result<()>;

    /// Strict fetch: the record must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the id has no live record — in
    /// particular after that id was deleted.
    fn fetch(&self, id: &Self::Id) -> Result<Todo<Self::Id>> {
        self.find_by_id(id)?.ok_or_else(|| Error::NotFound {
            id: id.to_string(),
        })
    }

    /// Checks whether a live record exists for the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn exists(&self, id: &Self::Id) -> Result<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Returns the number of live records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn count(&self) -> Result<usize> {
        Ok(self.find_all()?.len())
    }
}
