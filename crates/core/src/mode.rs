use serde::Serialize;
use std::fmt;

/// Direction of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `harden(true)`
    Apply,
    /// `harden(false)`
    Restore,
}

impl Mode {
    #[must_use]
    pub const fn from_enable(enable: bool) -> Self {
        if enable { Self::Apply } else { Self::Restore }
    }

    #[must_use]
    pub const fn enable(self) -> bool {
        matches!(self, Self::Apply)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
