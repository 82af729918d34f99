use crate::shared::{
    entity::{Entity, ID},
    record::{OwnerScope, Record, RecordMeta, SortKey},
};

/// An `Account` owns `Reminder`s. Accounts are provisioned outside of this
/// service and are only read when validating reminder ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: ID,
    pub full_name: String,
    pub meta: RecordMeta,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub full_name: Option<String>,
}

impl Entity for Account {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Record for Account {
    type Fields = NewAccount;
    type Changes = AccountChanges;

    const TABLE: &'static str = "accounts";
    const OWNER_SCOPE: OwnerScope = OwnerScope::SelfId;
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["id", "full_name", "created_on", "updated_on", "deleted_on"];

    fn build(id: ID, _owner_id: ID, fields: Self::Fields, meta: RecordMeta) -> Self {
        Self {
            id,
            full_name: fields.full_name,
            meta,
        }
    }

    fn apply(&mut self, changes: Self::Changes) {
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name;
        }
    }

    fn owner_id(&self) -> &ID {
        &self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => SortKey::Int(self.id.inner()),
            "full_name" => SortKey::Text(self.full_name.clone()),
            "created_on" => SortKey::Time(self.meta.created_on),
            "updated_on" => SortKey::Time(self.meta.updated_on),
            "deleted_on" => self.meta.deleted_on.into(),
            _ => SortKey::Null,
        }
    }
}
