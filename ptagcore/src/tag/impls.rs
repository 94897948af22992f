use std::{
    fmt,
    ops::{
        Deref,
        DerefMut,
    },
};
use crate::tag::*;

impl Tag {
    pub fn new(name: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_id: commit_id.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.commit_id)
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(args: Vec<Tag>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[Tag; N]> for Tags {
    fn from(args: [Tag; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for Tags {
    type Target = Vec<Tag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tags {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl TagDifference {
    pub fn new(tag: Tag, commit_difference: u64) -> Self {
        Self {
            tags: vec![tag],
            commit_difference,
        }
    }

    /// Keep whichever side is closer to the target; equal differences
    /// merge their tags, with `self` first.
    pub fn merge(mut self, next: Self) -> Self {
        match next.commit_difference.cmp(&self.commit_difference) {
            std::cmp::Ordering::Less => next,
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Equal => {
                self.tags.extend(next.tags);
                self
            }
        }
    }
}
