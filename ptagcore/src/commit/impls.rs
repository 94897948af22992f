use chrono::{
    DateTime,
    Utc,
};
use std::{
    cmp::Ordering,
    fmt,
};
use crate::commit::*;

impl CommitDistance {
    /// The difference as a signed commit count; `None` when the commits
    /// cannot be ordered.
    pub fn signed(&self) -> Option<i64> {
        match self {
            Self::Identical => Some(0),
            Self::Ahead(n) => Some(*n as i64),
            Self::Behind(n) => Some(-(*n as i64)),
            Self::Incomparable => None,
        }
    }

    pub fn is_comparable(&self) -> bool {
        !matches!(self, Self::Incomparable)
    }
}

impl fmt::Display for CommitDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signed() {
            Some(n) => write!(f, "{n:+}"),
            None => write!(f, "incomparable"),
        }
    }
}

impl CommitDate {
    pub fn new(
        author: Option<DateTime<Utc>>,
        committer: Option<DateTime<Utc>>,
    ) -> Self {
        Self { author, committer }
    }
}

/// Chronological ordering where an absent date sorts before any date
/// that is present, so tie-breaking is never undefined.
pub fn compare_nullable_dates(
    a: Option<&DateTime<Utc>>,
    b: Option<&DateTime<Utc>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
