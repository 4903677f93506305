use thiserror::Error;

use super::calendar::CalendarError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("timeline must be a positive number of months, got {0}")]
    NonPositiveTimeline(i64),

    #[error("timeline of {0} months cannot be placed on the calendar")]
    TimelineTooLong(i64),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
