pub mod usecase;

#[cfg(test)]
pub mod test_utils {
    use chrono::{DateTime, TimeZone, Utc};
    use remindme_domain::ID;
    use remindme_infra::{ISys, RemindmeContext};
    use std::sync::Arc;

    /// Clock that is frozen at the given point in time
    pub struct StaticTimeSys(pub DateTime<Utc>);

    impl ISys for StaticTimeSys {
        fn get_timestamp(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 19, 10, 0, 0).unwrap()
    }

    /// Inmemory context with the clock pinned at `start_time`
    pub fn setup_context() -> RemindmeContext {
        let mut ctx = RemindmeContext::create_inmemory();
        set_time(&mut ctx, start_time());
        ctx
    }

    pub fn set_time(ctx: &mut RemindmeContext, timestamp: DateTime<Utc>) {
        ctx.sys = Arc::new(StaticTimeSys(timestamp));
    }

    /// The account seeded by the inmemory context
    pub fn default_account() -> ID {
        ID::from(1)
    }
}
