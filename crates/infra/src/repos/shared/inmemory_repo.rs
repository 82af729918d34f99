use super::repo::{IRecordRepo, StoreError};
use chrono::{DateTime, Utc};
use remindme_domain::{Account, OwnerScope, PageQuery, Record, RecordMeta, ID};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

/// Rows of one table together with its id sequence
pub struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

/// Useful functions for creating inmemory repositories

pub fn find_by<T: Record, F: FnMut(&T) -> bool>(table: &Mutex<Table<T>>, mut compare: F) -> Vec<T> {
    let table = table.lock().unwrap();
    table.rows.iter().filter(|r| compare(*r)).cloned().collect()
}

fn is_active_and_owned<T: Record>(record: &T, id: &ID, owner_id: &ID) -> bool {
    record.id() == id && record.owner_id() == owner_id && !record.meta().is_deleted()
}

/// Runs `update` on the active record matching `id` and `owner_id` while holding the
/// table lock, so the check and the write cannot interleave with other writers of that table.
pub fn update_active<T: Record, U: FnOnce(&mut T) -> Result<(), StoreError>>(
    table: &Mutex<Table<T>>,
    id: &ID,
    owner_id: &ID,
    update: U,
) -> Result<T, StoreError> {
    let mut table = table.lock().unwrap();
    let record = table
        .rows
        .iter_mut()
        .find(|r| is_active_and_owned(&**r, id, owner_id))
        .ok_or(StoreError::NotFound)?;
    update(record)?;
    Ok(record.clone())
}

fn compare_records<T: Record>(r1: &T, r2: &T, query: &PageQuery) -> Ordering {
    let field = query.order_by.field;
    let ordering = r1.sort_key(field).cmp(&r2.sort_key(field));
    let ordering = if query.order_by.descending {
        ordering.reverse()
    } else {
        ordering
    };
    ordering.then_with(|| r1.id().cmp(r2.id()))
}

pub struct InMemoryRecordRepo<T: Record> {
    table: Mutex<Table<T>>,
    /// Used to resolve the owner `Account` on insert. `None` for the account table.
    owners: Option<Arc<InMemoryRecordRepo<Account>>>,
}

impl<T: Record> InMemoryRecordRepo<T> {
    pub fn new(owners: Option<Arc<InMemoryRecordRepo<Account>>>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            owners,
        }
    }

    pub(crate) fn table(&self) -> &Mutex<Table<T>> {
        &self.table
    }

    /// Appends a row without checking its owner
    pub(crate) fn push(&self, owner_id: &ID, fields: T::Fields, timestamp: DateTime<Utc>) -> ID {
        let mut table = self.table.lock().unwrap();
        let id = ID::from(table.next_id);
        table.next_id += 1;
        // Rows of the account table own themselves
        let owner_id = match T::OWNER_SCOPE {
            OwnerScope::SelfId => id,
            OwnerScope::Account => *owner_id,
        };
        table
            .rows
            .push(T::build(id, owner_id, fields, RecordMeta::new(timestamp)));
        id
    }

    /// Appends a row if its owner account is active. The owner table stays locked
    /// until the row is added, so the owner can not be deleted in between.
    fn push_owned(
        &self,
        owners: &InMemoryRecordRepo<Account>,
        owner_id: &ID,
        fields: T::Fields,
        timestamp: DateTime<Utc>,
    ) -> Result<ID, StoreError> {
        let owner_table = owners.table().lock().unwrap();
        if !owner_table
            .rows
            .iter()
            .any(|owner| is_active_and_owned(owner, owner_id, owner_id))
        {
            return Err(StoreError::NotFound);
        }
        let id = self.push(owner_id, fields, timestamp);
        drop(owner_table);
        Ok(id)
    }
}

#[async_trait::async_trait]
impl<T: Record> IRecordRepo<T> for InMemoryRecordRepo<T> {
    async fn find_active(&self, owner_id: &ID) -> Result<Vec<T>, StoreError> {
        Ok(find_by(&self.table, |r| {
            r.owner_id() == owner_id && !r.meta().is_deleted()
        }))
    }

    async fn find_page(&self, owner_id: &ID, query: &PageQuery) -> Result<Vec<T>, StoreError> {
        let mut records = find_by(&self.table, |r| r.owner_id() == owner_id);
        if T::OWNER_SCOPE == OwnerScope::SelfId {
            // The account table always answers with the single owner row
            return Ok(records);
        }
        records.sort_by(|r1, r2| compare_records(r1, r2, query));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(query.per_page).unwrap_or(usize::MAX);
        Ok(records.into_iter().skip(offset).take(per_page).collect())
    }

    async fn find_by_id(&self, owner_id: &ID, id: &ID) -> Result<Option<T>, StoreError> {
        Ok(find_by(&self.table, |r| is_active_and_owned(r, id, owner_id))
            .into_iter()
            .next())
    }

    async fn insert(
        &self,
        owner_id: &ID,
        fields: T::Fields,
        timestamp: DateTime<Utc>,
    ) -> Result<ID, StoreError> {
        match T::OWNER_SCOPE {
            OwnerScope::SelfId => Ok(self.push(owner_id, fields, timestamp)),
            OwnerScope::Account => {
                let owners = self.owners.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("No owner table configured for {}", T::TABLE)
                })?;
                self.push_owned(owners, owner_id, fields, timestamp)
            }
        }
    }

    async fn update(
        &self,
        id: &ID,
        owner_id: &ID,
        changes: T::Changes,
        timestamp: DateTime<Utc>,
    ) -> Result<T, StoreError> {
        update_active(&self.table, id, owner_id, |record| {
            record.meta_mut().touch(timestamp);
            record.apply(changes);
            Ok(())
        })
    }

    async fn soft_delete(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<T, StoreError> {
        update_active(&self.table, id, owner_id, |record| {
            record.meta_mut().mark_deleted(timestamp);
            Ok(())
        })
    }
}
