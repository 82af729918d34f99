pub mod entity;
pub mod record;
