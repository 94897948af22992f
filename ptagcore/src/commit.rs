use chrono::{
    DateTime,
    Utc,
};
use serde::{Deserialize, Serialize};

/// Directed ordering of a head commit relative to a base commit, as
/// reported by the remote comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum CommitDistance {
    /// Both refer to the same commit.
    Identical,
    /// The head is this many commits ahead of (a descendant of) the base.
    Ahead(u64),
    /// The head is this many commits behind (an ancestor of) the base.
    Behind(u64),
    /// Neither is an ancestor of the other, or the remote declined to
    /// work it out.
    Incomparable,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CommitDate {
    pub author: Option<DateTime<Utc>>,
    pub committer: Option<DateTime<Utc>>,
}

mod impls;

pub use impls::compare_nullable_dates;
