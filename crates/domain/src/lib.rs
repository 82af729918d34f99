mod account;
mod job;
mod reminder;
mod shared;

pub use account::{Account, AccountChanges, NewAccount};
pub use job::{JobHandle, JobState, ScheduledJob, SendReminderJob};
pub use reminder::{
    parse_reminder_time, InvalidReminderError, NewReminder, Reminder, ReminderChanges,
    ReminderStatus, MAX_MESSAGE_LENGTH, REMINDER_TIME_FORMAT,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::record::{
    InvalidPageQueryError, OrderBy, OwnerScope, PageQuery, Record, RecordMeta, SortKey,
};
