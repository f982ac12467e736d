//! Interface selector for ethtool requests.
//!
//! An [`Interface`] names a device by index, by name, or by both. The
//! kernel resolves the selector; when both are present it also checks that
//! they refer to the same device.
//!
//! ```ignore
//! use ethnl::Interface;
//!
//! let by_name: Interface = "eth0".into();
//! let by_index: Interface = 2u32.into();
//! let both = Interface::new(2, "eth0");
//! ```

use std::fmt;

/// A network interface selector.
///
/// Index `0`, an empty name, and `None` all mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Interface {
    /// Kernel interface index.
    pub index: Option<u32>,
    /// Interface name.
    pub name: Option<String>,
}

impl Interface {
    /// Select a device by both index and name.
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            name: Some(name.into()),
        }
    }

    /// Select a device by name.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            index: None,
            name: Some(name.into()),
        }
    }

    /// Select a device by index.
    #[inline]
    pub fn index(index: u32) -> Self {
        Self {
            index: Some(index),
            name: None,
        }
    }

    /// The index, if set and non-zero.
    pub fn as_index(&self) -> Option<u32> {
        self.index.filter(|&i| i > 0)
    }

    /// The name, if set and non-empty.
    pub fn as_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Returns `true` if neither an index nor a name is set.
    pub fn is_empty(&self) -> bool {
        self.as_index().is_none() && self.as_name().is_none()
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.as_index(), self.as_name()) {
            (Some(idx), Some(name)) => write!(f, "{} (ifindex:{})", name, idx),
            (None, Some(name)) => write!(f, "{}", name),
            (Some(idx), None) => write!(f, "ifindex:{}", idx),
            (None, None) => write!(f, "<unset>"),
        }
    }
}

impl From<&str> for Interface {
    #[inline]
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for Interface {
    #[inline]
    fn from(name: String) -> Self {
        Self::name(name)
    }
}

impl From<&String> for Interface {
    #[inline]
    fn from(name: &String) -> Self {
        Self::name(name.clone())
    }
}

impl From<u32> for Interface {
    #[inline]
    fn from(index: u32) -> Self {
        Self::index(index)
    }
}
