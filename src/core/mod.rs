pub mod calendar;
pub mod error;
pub mod money;
pub mod serde_helpers;

pub use calendar::{Clock, FixedClock, Period, ReportingCalendar, SystemClock, TimeWindow};
pub use error::{AppError, Result};
