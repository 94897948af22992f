use async_trait::async_trait;
use crate::{
    commit::{
        CommitDate,
        CommitDistance,
    },
    error::BackendError,
    filter::TagFilter,
    tag::Tags,
};

/// The remote operations tag resolution is built on.
#[async_trait]
pub trait TagBackend {
    /// Every tag whose name is accepted by the filter, in the order the
    /// remote lists them.  May be incomplete for very large repositories.
    async fn list_tags(
        &self,
        filter: &TagFilter,
    ) -> Result<Tags, BackendError>;
    async fn resolve_commit_id(
        &self,
        reference: &str,
    ) -> Result<String, BackendError>;
    /// Where `head` lies relative to `base`.
    async fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> Result<CommitDistance, BackendError>;
    async fn fetch_commit_date(
        &self,
        commit_id: &str,
    ) -> Result<CommitDate, BackendError>;
}
