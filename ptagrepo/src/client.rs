use crate::throttle::ThrottlePolicy;

/// Hard ceiling on tags gathered by a single listing.
pub const TAG_CAP: usize = 1000;
pub(crate) const PER_PAGE: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
}

pub struct GitHubClient<T> {
    transport: T,
    repository: Repository,
    policy: ThrottlePolicy,
    tag_cap: usize,
}

mod impls;
mod pager;
