//! Ages: the timestamps freshness is judged by.

use std::time::{SystemTime, UNIX_EPOCH};

/// The age of a build input or output.  This also models "never built" or
/// "file is absent".
///
/// Deliberately not `PartialOrd`: an unknown age is neither older nor newer
/// than a stamp, so every comparison goes through the helpers below.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Age {
    Unknown,
    Stamp(SystemTime),
}

impl Age {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Age::Unknown)
    }

    /// True only if both ages are stamps and `self` is strictly newer.
    pub fn is_newer_than(self, other: Age) -> bool {
        match (self, other) {
            (Age::Stamp(a), Age::Stamp(b)) => a > b,
            _ => false,
        }
    }

    /// The newer of two ages.  An unknown age never displaces a known one.
    pub fn newest(self, other: Age) -> Age {
        match (self, other) {
            (Age::Unknown, other) => other,
            (this, Age::Unknown) => this,
            (Age::Stamp(a), Age::Stamp(b)) => Age::Stamp(a.max(b)),
        }
    }
}

impl From<SystemTime> for Age {
    fn from(t: SystemTime) -> Self {
        Age::Stamp(t)
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Unknown => write!(f, "unknown age"),
            Age::Stamp(t) => match t.duration_since(UNIX_EPOCH) {
                Ok(d) => write!(f, "{}.{:09}", d.as_secs(), d.subsec_nanos()),
                Err(e) => {
                    let d = e.duration();
                    write!(f, "-{}.{:09}", d.as_secs(), d.subsec_nanos())
                }
            },
        }
    }
}
