//! Provider-style storage contract.

use crate::entity::{LocalId, StoredRow, ValueMap};
use crate::repo::StoreResult;
use crate::schema::ContentLocator;
use rusqlite::types::Value;

/// Query options for one `StorageGateway::query` call.
///
/// `selection` is a predicate with positional `?` placeholders bound from
/// `selection_args` in order. `None` projection selects every column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub projection: Option<Vec<String>>,
    pub selection: Option<String>,
    pub selection_args: Vec<Value>,
    pub sort_order: Option<String>,
}

impl RowQuery {
    /// Every row, every column, storage order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(selection: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            selection: Some(selection.into()),
            selection_args: args,
            ..Self::default()
        }
    }

    pub fn project<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn order_by(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

/// CRUD backend reachable by content locator.
///
/// Implementations are synchronous; each call completes or fails on the
/// caller's thread.
pub trait StorageGateway {
    fn query(&self, locator: &ContentLocator, query: &RowQuery) -> StoreResult<Vec<StoredRow>>;

    /// Inserts one row and returns its storage-assigned local id.
    fn insert(&self, locator: &ContentLocator, values: &ValueMap) -> StoreResult<LocalId>;

    /// Returns the number of rows changed.
    fn update(
        &self,
        locator: &ContentLocator,
        values: &ValueMap,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize>;

    /// Returns the number of rows removed.
    fn delete(
        &self,
        locator: &ContentLocator,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize>;
}

impl<G: StorageGateway + ?Sized> StorageGateway for &G {
    fn query(&self, locator: &ContentLocator, query: &RowQuery) -> StoreResult<Vec<StoredRow>> {
        (**self).query(locator, query)
    }

    fn insert(&self, locator: &ContentLocator, values: &ValueMap) -> StoreResult<LocalId> {
        (**self).insert(locator, values)
    }

    fn update(
        &self,
        locator: &ContentLocator,
        values: &ValueMap,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        (**self).update(locator, values, selection, selection_args)
    }

    fn delete(
        &self,
        locator: &ContentLocator,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        (**self).delete(locator, selection, selection_args)
    }
}
