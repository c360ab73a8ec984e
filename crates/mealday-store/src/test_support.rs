//! Helpers shared by the engine tests.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use chrono::NaiveDate;
use mealday_shared::{Notifier, NotifyError, PostedStatus};

use crate::clock::FixedClock;
use crate::engine::{EngineConfig, ScheduleEngine};

/// Records every posted message; optionally fails every post.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    posts: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn post(&self, message: &str) -> Result<PostedStatus, NotifyError> {
        if self.fail {
            return Err(NotifyError::Http("connection refused".to_string()));
        }
        let mut posts = self.posts.borrow_mut();
        posts.push(message.to_string());
        Ok(PostedStatus {
            id: posts.len().to_string(),
            text: message.to_string(),
        })
    }
}

/// Engine over `root` with default configuration, frozen at noon on the
/// given date.  The returned notifier shares its record with the engine.
pub fn engine_at(root: &Path, y: i32, m: u32, d: u32) -> (ScheduleEngine, RecordingNotifier) {
    let config = EngineConfig::new(root, root.join("report"));
    engine_with(config, RecordingNotifier::default(), y, m, d)
}

pub fn engine_with(
    config: EngineConfig,
    notifier: RecordingNotifier,
    y: i32,
    m: u32,
    d: u32,
) -> (ScheduleEngine, RecordingNotifier) {
    let today = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let engine = ScheduleEngine::new(
        config,
        Box::new(FixedClock::at_date(today)),
        Box::new(notifier.clone()),
    );
    (engine, notifier)
}

/// Write `<root>/<year>/<week>/<name>`, creating directories as needed.
pub fn write_day(root: &Path, year: &str, week: &str, name: &str, text: &str) {
    let dir = root.join(year).join(week);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), text).unwrap();
}
