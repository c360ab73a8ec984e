//! # mealday-store
//!
//! Flat-file storage and scheduling for the meal-of-the-day message.
//!
//! Messages live in a `year/week/<num>_<weekday>.txt` tree with one
//! `log.json` per week.  The crate exposes a synchronous [`ScheduleEngine`]
//! that prepares upcoming weeks, parses the tree into [`WeekRecord`]s and
//! [`DayRecord`]s, posts today's message through a
//! [`Notifier`](mealday_shared::Notifier) and renders reports.

pub mod calendar;
pub mod clock;
pub mod dispatch;
pub mod engine;
pub mod files;
pub mod models;
pub mod report;

mod error;
#[cfg(test)]
mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatch::SOLD_OUT_MESSAGE;
pub use engine::{EngineConfig, ScheduleEngine, WeekIndex};
pub use error::{Result, StoreError};
pub use models::*;
pub use report::ReportPaths;
