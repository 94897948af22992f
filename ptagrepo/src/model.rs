// Only the fields of the GitHub REST payloads that are consumed here;
// everything else in the responses is ignored.
use chrono::{
    DateTime,
    Utc,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TagEntry {
    pub name: String,
    pub commit: CommitSha,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitSha {
    #[serde(default)]
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Comparison {
    pub status: Option<String>,
    pub ahead_by: Option<i64>,
    pub behind_by: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Signature {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMessage {
    pub message: String,
}

/// The `message` of an error payload, or the raw body when it isn't one.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorMessage>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
