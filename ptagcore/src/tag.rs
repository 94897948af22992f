use serde::{Deserialize, Serialize};

/// A named pointer to a commit; never mutated once enumerated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tag {
    pub name: String,
    pub commit_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Tags(Vec<Tag>);

/// Every tag tied at the same commit difference against the target,
/// in the order they were encountered.
#[derive(Clone, Debug, PartialEq)]
pub struct TagDifference {
    pub tags: Vec<Tag>,
    pub commit_difference: u64,
}

mod impls;
