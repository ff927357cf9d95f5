//! Queue vocabulary: names, capacity bounds and ordering policy

use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::{impl_domain_enum_conversions, ProxyQError, Result};

/// One end of a remote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListEnd {
    /// The oldest element (index 0).
    Head,
    /// The most recently appended element.
    Tail,
}

impl ListEnd {
    /// End every queue appends to, regardless of ordering policy.
    pub const PUSH: Self = Self::Tail;
}

impl_domain_enum_conversions!(ListEnd {
    Head => "head",
    Tail => "tail",
});

/// Which end of the remote list `get` removes from.
///
/// Pushes always go to [`ListEnd::PUSH`]; the policy only chooses the pop
/// end, so FIFO and LIFO share one queue implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Pop from the end opposite to the push end.
    #[default]
    Fifo,
    /// Pop from the push end.
    Lifo,
}

impl OrderingPolicy {
    /// End of the list that `get` pops from under this policy.
    #[must_use]
    pub const fn pop_end(self) -> ListEnd {
        match self {
            Self::Fifo => ListEnd::Head,
            Self::Lifo => ListEnd::Tail,
        }
    }
}

impl_domain_enum_conversions!(OrderingPolicy {
    Fifo => "fifo",
    Lifo => "lifo",
});

/// Maximum number of items a queue should hold.
///
/// Built from a signed maximum where `0` or any negative value means
/// "unbounded". The bound is a target enforced by check-then-act, so a
/// remote list can transiently exceed it when several processes push at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity(Option<NonZeroU64>);

impl Capacity {
    /// Capacity with no upper bound.
    pub const UNBOUNDED: Self = Self(None);

    /// Interpret a configured maximum (`<= 0` means unbounded).
    #[must_use]
    pub fn from_max(max: i64) -> Self {
        Self(u64::try_from(max).ok().and_then(NonZeroU64::new))
    }

    /// The bound, if any.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.0.map(NonZeroU64::get)
    }

    /// Returns `true` when a maximum is configured.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.0.is_some()
    }

    /// Returns `true` when `size` meets or exceeds the bound.
    ///
    /// Uses `>=` so that a list already pushed past capacity by a concurrent
    /// writer is still reported as full.
    #[must_use]
    pub fn is_reached_by(&self, size: u64) -> bool {
        self.limit().is_some_and(|limit| size >= limit)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(limit) => write!(f, "{limit}"),
            None => f.write_str("unbounded"),
        }
    }
}

/// Key of the remote list backing a queue. Never empty or blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueName(String);

impl QueueName {
    /// Validate and wrap a queue name.
    ///
    /// # Errors
    /// Returns [`ProxyQError::InvalidInput`] if the name is empty or only
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProxyQError::InvalidInput("queue name must not be empty".to_string()));
        }
        Ok(Self(name))
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QueueName {
    type Error = ProxyQError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<QueueName> for String {
    fn from(value: QueueName) -> Self {
        value.0
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
