use chrono::{DateTime, Utc};
use iimpact_shared_contracts::TimeService;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeServiceImpl;

impl TimeService for TimeServiceImpl {
    #[tracing::instrument(level = "trace", skip(self), ret)]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
