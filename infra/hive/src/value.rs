use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Rights requested when opening a location.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;

        const ALL = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// A typed entry stored under a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string entry (`REG_SZ`).
    String(String),
    /// A 32-bit number entry (`REG_DWORD`).
    Dword(u32),
}

impl Value {
    /// Short type tag, as used in diagnostics and by the filesystem backend.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "sz",
            Self::Dword(_) => "dword",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Dword(_) => None,
        }
    }

    #[must_use]
    pub const fn as_dword(&self) -> Option<u32> {
        match self {
            Self::Dword(v) => Some(*v),
            Self::String(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Dword(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Dword(v) => write!(f, "dword:{v:08x}"),
        }
    }
}
