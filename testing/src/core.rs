use async_trait::async_trait;
use mockall::mock;
use ptagcore::{
    commit::{
        CommitDate,
        CommitDistance,
    },
    error::BackendError,
    filter::TagFilter,
    platform::TagBackend,
    tag::{
        Tag,
        Tags,
    },
};

mock! {
    pub Backend {}

    #[async_trait]
    impl TagBackend for Backend {
        async fn list_tags(
            &self, filter: &TagFilter
        ) -> Result<Tags, BackendError>;
        async fn resolve_commit_id(
            &self, reference: &str
        ) -> Result<String, BackendError>;
        async fn compare_commits(
            &self, base: &str, head: &str
        ) -> Result<CommitDistance, BackendError>;
        async fn fetch_commit_date(
            &self, commit_id: &str
        ) -> Result<CommitDate, BackendError>;
    }
}

/// A tag whose commit id is derived from its name, so that tests can
/// map back and forth between the two without a lookup table.
pub fn tag(name: &str) -> Tag {
    Tag::new(name, commit_id(name))
}

pub fn commit_id(name: &str) -> String {
    format!("{name}-sha")
}

pub fn tags(names: &[&str]) -> Tags {
    names.iter()
        .map(|name| tag(name))
        .collect::<Vec<_>>()
        .into()
}
