use clap::Parser;
use ptagcore::filter::TagFilter;
use ptagrepo::{
    Repository,
    throttle::ThrottlePolicy,
    transport::DEFAULT_API_URL,
};
use regex::Regex;
use std::time::Duration;

use crate::{
    error::InputError,
    resolve::ResolveOptions,
};

pub const DEFAULT_REF: &str = "HEAD";

/// Inputs as provided by the workflow step, either as flags or through
/// the `INPUT_*` variables the runner exports.
#[derive(Debug, Parser)]
#[command(name = "preceding-tag", version, about)]
pub struct Input {
    /// Repository in the form owner/repo; defaults to the one the workflow
    /// runs in.
    #[clap(long, value_name = "OWNER/REPO", env = "INPUT_REPOSITORY", default_value = "")]
    repository: String,
    #[clap(long, env = "GITHUB_REPOSITORY", hide = true)]
    context_repository: Option<String>,
    /// The commit, branch or tag to find the preceding tag of.
    #[clap(long = "ref", value_name = "REF", env = "INPUT_REF", default_value = "")]
    reference: String,
    /// Only consider tags matching this regular expression.
    #[clap(long, value_name = "REGEX", env = "INPUT_REGEX", default_value = "")]
    regex: String,
    /// Consider a tag pointing exactly at the ref as preceding it.
    #[clap(long, value_name = "BOOL", env = "INPUT_INCLUDE-REF", default_value = "false")]
    include_ref: String,
    /// Output when no tag is found.
    #[clap(long, value_name = "TAG", env = "INPUT_DEFAULT-TAG", default_value = "")]
    default_tag: String,
    #[clap(long, value_name = "TOKEN", env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[clap(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    context_token: Option<String>,
    #[clap(long, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Do not retry rate limited requests that would wait longer than this.
    #[clap(long, value_name = "MINUTES", env = "INPUT_MAX-RETRY-MINUTES", default_value = "62")]
    max_retry_minutes: u64,
    /// Remote queries allowed in flight at once.
    #[clap(long, value_name = "N", env = "INPUT_MAX-CONCURRENCY", default_value = "10")]
    max_concurrency: usize,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Validated and normalized inputs.
#[derive(Debug)]
pub struct Config {
    pub repository: Repository,
    pub reference: String,
    pub options: ResolveOptions,
    pub default_tag: String,
    pub token: Option<String>,
    pub api_url: String,
    pub policy: ThrottlePolicy,
}

impl Input {
    pub fn validate(&self) -> Result<Config, InputError> {
        let regex = parse_regex(&self.regex)?;
        if let Some(warning) = default_tag_warning(&self.default_tag, regex.as_ref()) {
            log::warn!("{warning}");
        }
        let filter = match regex {
            Some(regex) => TagFilter::new(move |name| regex.is_match(name)),
            None => TagFilter::default(),
        };
        Ok(Config {
            repository: parse_repository(
                non_empty(&self.repository)
                    .or(self.context_repository.as_deref().and_then(non_empty))
                    .unwrap_or(""),
            )?,
            reference: parse_ref(&self.reference)?,
            options: ResolveOptions {
                filter,
                include_ref: parse_bool("include-ref", &self.include_ref)?,
                concurrency: self.max_concurrency,
            },
            default_tag: self.default_tag.clone(),
            token: self.token.as_deref()
                .and_then(non_empty)
                .or(self.context_token.as_deref().and_then(non_empty))
                .map(str::to_string),
            api_url: self.api_url.clone(),
            policy: ThrottlePolicy::new(
                Duration::from_secs(self.max_retry_minutes * 60)
            ),
        })
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

pub fn parse_repository(input: &str) -> Result<Repository, InputError> {
    let invalid = || InputError::Repository(input.to_string());
    let repository: Repository = input.parse().map_err(|_| invalid())?;
    if [&repository.owner, &repository.repo]
        .iter()
        .any(|part| *part == "." || *part == "..")
    {
        return Err(invalid());
    }
    Ok(repository)
}

/// Empty selects `HEAD`; otherwise the ref must be something that may
/// appear in a ref name and in an API path.
pub fn parse_ref(input: &str) -> Result<String, InputError> {
    if input.is_empty() {
        return Ok(DEFAULT_REF.to_string());
    }
    let invalid = input == "@"
        || input.starts_with('/')
        || input.ends_with('/')
        || input.ends_with('.')
        || input.ends_with(".lock")
        || input.contains("..")
        || input.contains("//")
        || input.contains("@{")
        || input.split('/').any(|part| part.starts_with('.'))
        || input.chars().any(|c| c.is_control() || " ~^:?*[\\&#%".contains(c));
    if invalid {
        Err(InputError::Ref(input.to_string()))
    }
    else {
        Ok(input.to_string())
    }
}

pub fn parse_regex(input: &str) -> Result<Option<Regex>, InputError> {
    if input.is_empty() {
        return Ok(None);
    }
    Regex::new(input)
        .map(Some)
        .map_err(|e| InputError::Regex(input.to_string(), e.to_string()))
}

/// Booleans as accepted by the YAML 1.2 core schema.
pub fn parse_bool(name: &'static str, input: &str) -> Result<bool, InputError> {
    match input {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(InputError::Boolean {
            name,
            value: input.to_string(),
        }),
    }
}

pub fn default_tag_warning(default_tag: &str, regex: Option<&Regex>) -> Option<String> {
    match regex {
        Some(regex) if !default_tag.is_empty() && !regex.is_match(default_tag) => {
            Some(format!(
                "default-tag {default_tag:?} does not match the regex {:?}",
                regex.as_str(),
            ))
        }
        _ => None,
    }
}
