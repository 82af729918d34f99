use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Bookkeeping columns present on every persisted table.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMeta {
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    /// Soft delete marker. Once set it is never cleared.
    pub deleted_on: Option<DateTime<Utc>>,
}

impl RecordMeta {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            created_on: timestamp,
            updated_on: timestamp,
            deleted_on: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_on.is_some()
    }

    pub fn touch(&mut self, timestamp: DateTime<Utc>) {
        self.updated_on = timestamp;
    }

    pub fn mark_deleted(&mut self, timestamp: DateTime<Utc>) {
        self.updated_on = timestamp;
        if self.deleted_on.is_none() {
            self.deleted_on = Some(timestamp);
        }
    }
}

/// How rows of a table are scoped to the account id given to the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OwnerScope {
    /// The table is the account table itself, rows are matched on their own id
    SelfId,
    /// Rows carry a foreign key to the owning account
    Account,
}

/// Describes an entity that can be kept in the soft deleting record store.
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// Fields provided by the caller when creating a row
    type Fields: Send + std::fmt::Debug;
    /// Partial update applied to an existing row
    type Changes: Send + std::fmt::Debug;

    const TABLE: &'static str;
    const OWNER_SCOPE: OwnerScope;
    /// Columns that are allowed in an `ORDER BY`
    const SORTABLE_FIELDS: &'static [&'static str];

    fn build(id: ID, owner_id: ID, fields: Self::Fields, meta: RecordMeta) -> Self;
    fn apply(&mut self, changes: Self::Changes);

    fn owner_id(&self) -> &ID;
    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Value of one of the `SORTABLE_FIELDS`, used by backends that sort in process
    fn sort_key(&self, field: &str) -> SortKey;
}

/// A comparable column value. `Null` sorts after every value like postgres does
/// for ascending orderings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Bool(bool),
    Int(i64),
    Text(String),
    Time(DateTime<Utc>),
    Null,
}

impl From<Option<DateTime<Utc>>> for SortKey {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(ts) => Self::Time(ts),
            None => Self::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: &'static str,
    pub descending: bool,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidPageQueryError {
    #[error("Cannot sort by unknown field: `{0}`")]
    UnknownSortField(String),
    #[error("Page size must be at least 1, got: {0}")]
    InvalidPageSize(i64),
    #[error("Page index cannot be negative, got: {0}")]
    InvalidPageIndex(i64),
}

impl OrderBy {
    /// Parses a sort expression like `reminder_time` or `-created_on` against the
    /// sortable fields of `T`
    pub fn parse<T: Record>(raw: &str) -> Result<Self, InvalidPageQueryError> {
        let raw = raw.trim();
        let (name, descending) = match raw.strip_prefix('-') {
            Some(name) => (name, true),
            None => (raw, false),
        };
        T::SORTABLE_FIELDS
            .iter()
            .find(|field| **field == name)
            .map(|field| Self {
                field: *field,
                descending,
            })
            .ok_or_else(|| InvalidPageQueryError::UnknownSortField(raw.to_string()))
    }
}

/// A validated page request
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub per_page: i64,
    /// Zero based page index
    pub page: i64,
    pub order_by: OrderBy,
}

impl PageQuery {
    pub fn new<T: Record>(
        per_page: i64,
        page: i64,
        order_by: &str,
    ) -> Result<Self, InvalidPageQueryError> {
        if per_page < 1 {
            return Err(InvalidPageQueryError::InvalidPageSize(per_page));
        }
        if page < 0 {
            return Err(InvalidPageQueryError::InvalidPageIndex(page));
        }
        Ok(Self {
            per_page,
            page,
            order_by: OrderBy::parse::<T>(order_by)?,
        })
    }

    pub fn offset(&self) -> i64 {
        self.per_page.saturating_mul(self.page)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Reminder;

    #[test]
    fn parses_order_by() {
        assert_eq!(
            OrderBy::parse::<Reminder>("id").unwrap(),
            OrderBy {
                field: "id",
                descending: false
            }
        );
        assert_eq!(
            OrderBy::parse::<Reminder>("-reminder_time").unwrap(),
            OrderBy {
                field: "reminder_time",
                descending: true
            }
        );
        assert_eq!(
            OrderBy::parse::<Reminder>("id; DROP TABLE reminders").unwrap_err(),
            InvalidPageQueryError::UnknownSortField("id; DROP TABLE reminders".into())
        );
    }

    #[test]
    fn rejects_invalid_pages() {
        assert!(PageQuery::new::<Reminder>(0, 0, "id").is_err());
        assert!(PageQuery::new::<Reminder>(10, -1, "id").is_err());
        let query = PageQuery::new::<Reminder>(10, 3, "id").unwrap();
        assert_eq!(query.offset(), 30);
    }

    #[test]
    fn null_sorts_last() {
        let mut keys = vec![SortKey::Null, SortKey::Time(Utc::now())];
        keys.sort();
        assert_eq!(keys[1], SortKey::Null);
    }

    #[test]
    fn deleted_on_is_never_cleared() {
        let first = Utc::now();
        let mut meta = RecordMeta::new(first);
        meta.mark_deleted(first);
        let later = first + chrono::Duration::seconds(5);
        meta.mark_deleted(later);
        assert_eq!(meta.deleted_on, Some(first));
        assert_eq!(meta.updated_on, later);
    }
}
