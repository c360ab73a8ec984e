use crate::constants::{SYMBOL_FAIL, SYMBOL_OK, SYMBOL_WARN};

/// Sendability classification of a day, or of a whole week.
///
/// Weeks only ever use `Ok` and `Warn`; `Fail` is reserved for a day whose
/// message exceeds the length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

impl Status {
    pub fn glyph(self) -> &'static str {
        match self {
            Status::Ok => SYMBOL_OK,
            Status::Warn => SYMBOL_WARN,
            Status::Fail => SYMBOL_FAIL,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}
