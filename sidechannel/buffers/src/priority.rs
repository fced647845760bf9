/*!
    Worker thread priority.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/**
    Scheduling priority of a buffering worker thread.

    This is the platform's relative priority value, reported for display
    only. The well-known levels match the Win32 thread priority scale.
*/
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ThreadPriority(pub i32);

impl ThreadPriority {
    pub const IDLE: Self = Self(-15);
    pub const LOWEST: Self = Self(-2);
    pub const BELOW_NORMAL: Self = Self(-1);
    pub const NORMAL: Self = Self(0);
    pub const ABOVE_NORMAL: Self = Self(1);
    pub const HIGHEST: Self = Self(2);
    pub const TIME_CRITICAL: Self = Self(15);

    /**
        Name of the well-known level, if this is one.
    */
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            -15 => "idle",
            -2 => "lowest",
            -1 => "below normal",
            0 => "normal",
            1 => "above normal",
            2 => "highest",
            15 => "time critical",
            _ => return None,
        })
    }
}

impl fmt::Display for ThreadPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}
