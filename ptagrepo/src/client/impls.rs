use async_trait::async_trait;
use chrono::Utc;
use http::{
    StatusCode,
    header::LINK,
};
use ptagcore::{
    commit::{
        CommitDate,
        CommitDistance,
    },
    error::BackendError,
    filter::TagFilter,
    platform::TagBackend,
    tag::Tags,
};
use std::{
    fmt,
    str::FromStr,
};

use crate::{
    error::RemoteError,
    model::{
        Commit,
        Comparison,
        TagEntry,
        error_message,
    },
    throttle::{
        RateLimit,
        ThrottleDecision,
        ThrottlePolicy,
    },
    transport::{
        Response,
        Transport,
    },
};

use super::*;
use super::pager::{
    PageOutcome,
    TagPager,
};

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty()
                    && !repo.is_empty()
                    && !repo.contains('/') => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(format!("expected format {{owner}}/{{repo}}, got {s:?}")),
        }
    }
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(
        transport: T,
        repository: Repository,
        policy: ThrottlePolicy,
    ) -> Self {
        Self {
            transport,
            repository,
            policy,
            tag_cap: TAG_CAP,
        }
    }

    pub fn with_tag_cap(mut self, tag_cap: usize) -> Self {
        self.tag_cap = tag_cap;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn repo_path(&self, rest: &str) -> String {
        format!("/repos/{}/{}/{rest}", self.repository.owner, self.repository.repo)
    }

    /// Issue the request under the throttle policy.  A rate limited
    /// request is only ever delayed or abandoned here, never reinterpreted.
    async fn request(&self, path: &str) -> Result<Response, RemoteError> {
        let mut retry_count = 0;
        loop {
            let response = self.transport.get(path).await?;
            match RateLimit::classify(&response, Utc::now()) {
                None => return Ok(response),
                Some(RateLimit::Primary { retry_after }) => {
                    match self.policy.on_rate_limit(retry_after, retry_count) {
                        ThrottleDecision::Retry(wait) => {
                            warn!(
                                "request quota exhausted for GET {path}; \
                                retrying after {} seconds ({})",
                                wait.as_secs(),
                                (Utc::now() + chrono::Duration::seconds(
                                    wait.as_secs() as i64
                                )).to_rfc3339(),
                            );
                            tokio::time::sleep(wait).await;
                            retry_count += 1;
                        }
                        ThrottleDecision::Abandon => {
                            warn!(
                                "request quota exhausted for GET {path}; \
                                not retrying (wait {} seconds, retried {} times, \
                                maximum wait {} seconds)",
                                retry_after.as_secs(),
                                retry_count,
                                self.policy.max_retry_wait.as_secs(),
                            );
                            return Err(RemoteError::RateLimited {
                                path: path.to_string(),
                                retry_after,
                            });
                        }
                    }
                }
                Some(RateLimit::Secondary { retry_after }) => {
                    error!(
                        "abuse detected for request GET {path}; not retrying \
                        (server asked to wait {:?} seconds)",
                        retry_after.map(|d| d.as_secs()),
                    );
                    return Err(RemoteError::AbusePrevented {
                        path: path.to_string(),
                    });
                }
            }
        }
    }

    /// Request and return the body of a successful response, mapping
    /// the failure statuses shared by every endpoint.
    async fn request_ok(&self, path: &str) -> Result<Response, RemoteError> {
        let response = self.request(path).await?;
        if response.status.is_success() {
            return Ok(response);
        }
        let message = error_message(&response.body);
        match response.status {
            _ if is_too_expensive(response.status, &message) => {
                Err(RemoteError::ComparisonTooExpensive(message))
            }
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(RemoteError::NotFound(message))
            }
            status => Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn fetch_commit(&self, reference: &str) -> Result<Commit, RemoteError> {
        let path = self.repo_path(&format!("commits/{reference}"));
        let response = self.request_ok(&path).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn fetch_tags(&self, filter: &TagFilter) -> Result<Tags, RemoteError> {
        let mut pager = TagPager::new(filter, self.tag_cap, PER_PAGE);
        loop {
            let path = self.repo_path(&format!(
                "tags?per_page={PER_PAGE}&page={}",
                pager.next_page(),
            ));
            let response = self.request_ok(&path).await?;
            let has_next = has_next_page(&response);
            let entries: Vec<TagEntry> = serde_json::from_str(&response.body)?;
            match pager.absorb(entries, has_next) {
                PageOutcome::More => continue,
                PageOutcome::Done => break,
                PageOutcome::Capped => {
                    warn!(
                        "stopped listing tags for {} after reaching the \
                        limit of {} tags; older tags were not considered",
                        self.repository,
                        self.tag_cap,
                    );
                    break;
                }
            }
        }
        info!("found {} matching tags in {}", pager.len(), self.repository);
        Ok(pager.into_tags())
    }

    pub async fn fetch_commit_difference(
        &self,
        base: &str,
        head: &str,
    ) -> Result<CommitDistance, RemoteError> {
        let path = self.repo_path(&format!(
            "compare/{base}...{head}?page=1&per_page=1"
        ));
        let response = match self.request_ok(&path).await {
            Ok(response) => response,
            Err(RemoteError::ComparisonTooExpensive(message)) => {
                warn!(
                    "unable to compare {base}...{head}, treating as \
                    incomparable: {message}"
                );
                return Ok(CommitDistance::Incomparable);
            }
            Err(e) => return Err(e),
        };
        let comparison: Comparison = serde_json::from_str(&response.body)?;
        to_distance(comparison)
    }
}

fn to_distance(comparison: Comparison) -> Result<CommitDistance, RemoteError> {
    fn magnitude(field: &str, value: Option<i64>) -> Result<u64, RemoteError> {
        match value {
            Some(n) if n >= 0 => Ok(n as u64),
            Some(n) => Err(RemoteError::Payload(format!("{field} is negative: {n}"))),
            None => Err(RemoteError::Payload(format!("{field} is missing"))),
        }
    }

    match comparison.status.as_deref() {
        Some("ahead") => Ok(CommitDistance::Ahead(
            magnitude("ahead_by", comparison.ahead_by)?
        )),
        Some("behind") => Ok(CommitDistance::Behind(
            magnitude("behind_by", comparison.behind_by)?
        )),
        Some("identical") => Ok(CommitDistance::Identical),
        Some("diverged") => Ok(CommitDistance::Incomparable),
        Some(status) => Err(RemoteError::Payload(
            format!("unknown compare status: {status}")
        )),
        None => Err(RemoteError::Payload(
            "compare status is missing".to_string()
        )),
    }
}

// GitHub gives up on comparisons whose diff is too large to produce in
// time, with either a 422 or a 5xx depending on where it timed out.
fn is_too_expensive(status: StatusCode, message: &str) -> bool {
    if status != StatusCode::UNPROCESSABLE_ENTITY && !status.is_server_error() {
        return false;
    }
    let message = message.to_lowercase();
    message.contains("too long to generate")
        || message.contains("diff is too large")
        || message.contains("timed out")
}

fn has_next_page(response: &Response) -> bool {
    response.headers.get(LINK)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|link| link.contains("rel=\"next\"")))
        .unwrap_or(false)
}

#[async_trait]
impl<T: Transport> TagBackend for GitHubClient<T> {
    async fn list_tags(
        &self,
        filter: &TagFilter,
    ) -> Result<Tags, BackendError> {
        Ok(self.fetch_tags(filter).await?)
    }

    async fn resolve_commit_id(
        &self,
        reference: &str,
    ) -> Result<String, BackendError> {
        let commit = self.fetch_commit(reference).await?;
        debug!("resolved {reference} to {}", commit.sha);
        Ok(commit.sha)
    }

    async fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> Result<CommitDistance, BackendError> {
        Ok(self.fetch_commit_difference(base, head).await?)
    }

    async fn fetch_commit_date(
        &self,
        commit_id: &str,
    ) -> Result<CommitDate, BackendError> {
        let commit = self.fetch_commit(commit_id).await?;
        Ok(CommitDate::new(
            commit.commit.author.and_then(|s| s.date),
            commit.commit.committer.and_then(|s| s.date),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn comparison(
        status: Option<&str>,
        ahead_by: Option<i64>,
        behind_by: Option<i64>,
    ) -> Comparison {
        Comparison {
            status: status.map(str::to_string),
            ahead_by,
            behind_by,
        }
    }

    #[test]
    fn distance_from_status() {
        assert_eq!(
            to_distance(comparison(Some("ahead"), Some(4), Some(0))).unwrap(),
            CommitDistance::Ahead(4),
        );
        assert_eq!(
            to_distance(comparison(Some("behind"), Some(0), Some(4))).unwrap(),
            CommitDistance::Behind(4),
        );
        assert_eq!(
            to_distance(comparison(Some("identical"), None, None)).unwrap(),
            CommitDistance::Identical,
        );
        assert_eq!(
            to_distance(comparison(Some("diverged"), Some(3), Some(2))).unwrap(),
            CommitDistance::Incomparable,
        );
    }

    #[test]
    fn distance_contract_violations() {
        assert!(matches!(
            to_distance(comparison(Some("ahead"), Some(-1), None)),
            Err(RemoteError::Payload(_)),
        ));
        assert!(matches!(
            to_distance(comparison(Some("behind"), None, Some(-1))),
            Err(RemoteError::Payload(_)),
        ));
        assert!(matches!(
            to_distance(comparison(Some("ahead"), None, None)),
            Err(RemoteError::Payload(_)),
        ));
        assert!(matches!(
            to_distance(comparison(Some("sideways"), Some(1), Some(1))),
            Err(RemoteError::Payload(_)),
        ));
        assert!(matches!(
            to_distance(comparison(None, None, None)),
            Err(RemoteError::Payload(_)),
        ));
    }

    #[test]
    fn too_expensive() {
        let message = "Server Error: Sorry, this diff is taking too long to generate.";
        assert!(is_too_expensive(StatusCode::INTERNAL_SERVER_ERROR, message));
        assert!(is_too_expensive(StatusCode::UNPROCESSABLE_ENTITY, message));
        assert!(!is_too_expensive(StatusCode::NOT_FOUND, message));
        assert!(!is_too_expensive(StatusCode::INTERNAL_SERVER_ERROR, "Server Error"));
    }

    #[test]
    fn repository_from_str() {
        let repository: Repository = "AJGranowski/preceding-tag-action".parse().unwrap();
        assert_eq!(repository.owner, "AJGranowski");
        assert_eq!(repository.repo, "preceding-tag-action");
        assert_eq!(repository.to_string(), "AJGranowski/preceding-tag-action");
        assert!("owner".parse::<Repository>().is_err());
        assert!("/".parse::<Repository>().is_err());
        assert!("a/b/c".parse::<Repository>().is_err());
    }

    #[test]
    fn next_page_link() {
        let mut response = Response {
            status: StatusCode::OK,
            headers: Default::default(),
            body: "[]".to_string(),
        };
        assert!(!has_next_page(&response));
        response.headers.insert(LINK, concat!(
            "<https://api.github.com/repositories/1/tags?page=2>; rel=\"next\", ",
            "<https://api.github.com/repositories/1/tags?page=5>; rel=\"last\"",
        ).parse().unwrap());
        assert!(has_next_page(&response));
        response.headers.insert(LINK, concat!(
            "<https://api.github.com/repositories/1/tags?page=4>; rel=\"prev\", ",
            "<https://api.github.com/repositories/1/tags?page=1>; rel=\"first\"",
        ).parse().unwrap());
        assert!(!has_next_page(&response));
    }
}
