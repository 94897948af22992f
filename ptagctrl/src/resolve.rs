use futures::{
    StreamExt,
    TryStreamExt,
    stream,
};
use ptagcore::{
    commit::{
        CommitDate,
        CommitDistance,
        compare_nullable_dates,
    },
    error::BackendError,
    filter::TagFilter,
    platform::TagBackend,
    tag::{
        Tag,
        TagDifference,
    },
};
use std::cmp::Ordering;

/// Upper bound on remote queries in flight at once during a resolution.
pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug)]
pub struct ResolveOptions {
    pub filter: TagFilter,
    /// Whether a tag pointing exactly at the reference counts as preceding
    /// it.
    pub include_ref: bool,
    pub concurrency: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            filter: TagFilter::default(),
            include_ref: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ResolveOptions {
    fn limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Finds the most recent tag reachable from a commit, much like
/// `git describe --tags --abbrev=0` but entirely through the remote.
///
/// Ties in distance are broken by the most recent committer date, then
/// author date, then whichever tag was listed first.
pub struct PrecedingTag<'a, B> {
    backend: &'a B,
}

impl<'a, B: TagBackend + Sync> PrecedingTag<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// `Ok(None)` when no tag precedes the reference; any remote failure
    /// aborts the whole resolution.
    pub async fn resolve(
        &self,
        reference: &str,
        options: &ResolveOptions,
    ) -> Result<Option<Tag>, BackendError> {
        let target = self.backend.resolve_commit_id(reference).await?;
        let target = target.as_str();
        let tags = self.backend.list_tags(&options.filter).await?;
        log::debug!("comparing {} tags against {reference} ({target})", tags.len());

        // listing order is kept, the date tie-break depends on it
        let distances: Vec<_> = stream::iter(tags)
            .map(|tag| async move {
                let distance = self.backend
                    .compare_commits(&tag.commit_id, target)
                    .await?;
                log::debug!("tag {} is {distance} from {target}", tag.name);
                Ok::<_, BackendError>((tag, distance))
            })
            .buffered(options.limit())
            .try_collect()
            .await?;

        let closest = distances.into_iter()
            .filter_map(|(tag, distance)| candidate(tag, distance, options.include_ref))
            .reduce(TagDifference::merge);
        let mut tags = match closest {
            None => {
                log::info!("no tag precedes {reference}");
                return Ok(None);
            }
            Some(closest) => closest.tags,
        };
        if tags.len() == 1 {
            return Ok(tags.pop());
        }
        log::info!(
            "{} tags are equally close to {reference}; breaking the tie by date",
            tags.len(),
        );
        self.most_recent(tags, options.limit()).await
    }

    async fn most_recent(
        &self,
        tags: Vec<Tag>,
        limit: usize,
    ) -> Result<Option<Tag>, BackendError> {
        let dated: Vec<_> = stream::iter(tags)
            .map(|tag| async move {
                let date = self.backend
                    .fetch_commit_date(&tag.commit_id)
                    .await?;
                Ok::<_, BackendError>((tag, date))
            })
            .buffered(limit)
            .try_collect()
            .await?;
        Ok(dated.into_iter()
            .reduce(|prev, next| if is_more_recent(&next.1, &prev.1) {
                next
            } else {
                prev
            })
            .map(|(tag, _)| tag))
    }
}

pub async fn fetch_preceding_tag<B: TagBackend + Sync>(
    backend: &B,
    reference: &str,
    options: &ResolveOptions,
) -> Result<Option<Tag>, BackendError> {
    PrecedingTag::new(backend).resolve(reference, options).await
}

// Tags ahead of or diverged from the target never precede it; a tag on
// the target itself only does when asked for.
fn candidate(
    tag: Tag,
    distance: CommitDistance,
    include_ref: bool,
) -> Option<TagDifference> {
    match distance.signed() {
        Some(n) if n > 0 => Some(TagDifference::new(tag, n as u64)),
        Some(0) if include_ref => Some(TagDifference::new(tag, 0)),
        _ => None,
    }
}

fn is_more_recent(next: &CommitDate, prev: &CommitDate) -> bool {
    match compare_nullable_dates(next.committer.as_ref(), prev.committer.as_ref()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => compare_nullable_dates(
            next.author.as_ref(),
            prev.author.as_ref(),
        ) == Ordering::Greater,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tag(name: &str) -> Tag {
        Tag::new(name, format!("{name}-sha"))
    }

    #[test]
    fn candidates() {
        assert_eq!(
            candidate(tag("t"), CommitDistance::Ahead(3), false),
            Some(TagDifference::new(tag("t"), 3)),
        );
        assert_eq!(candidate(tag("t"), CommitDistance::Behind(1), false), None);
        assert_eq!(candidate(tag("t"), CommitDistance::Behind(1), true), None);
        assert_eq!(candidate(tag("t"), CommitDistance::Incomparable, true), None);
        assert_eq!(candidate(tag("t"), CommitDistance::Identical, false), None);
        assert_eq!(candidate(tag("t"), CommitDistance::Ahead(0), false), None);
        assert_eq!(
            candidate(tag("t"), CommitDistance::Identical, true),
            Some(TagDifference::new(tag("t"), 0)),
        );
    }

    #[test]
    fn recency() {
        use chrono::{
            TimeZone,
            Utc,
        };
        let early = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let late = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());

        // committer first
        assert!(is_more_recent(
            &CommitDate::new(early, late),
            &CommitDate::new(late, early),
        ));
        // then author
        assert!(is_more_recent(
            &CommitDate::new(late, late),
            &CommitDate::new(early, late),
        ));
        // missing dates are the oldest
        assert!(is_more_recent(
            &CommitDate::new(None, early),
            &CommitDate::new(late, None),
        ));
        // indistinguishable keeps the earlier one
        assert!(!is_more_recent(
            &CommitDate::new(late, late),
            &CommitDate::new(late, late),
        ));
        assert!(!is_more_recent(&CommitDate::default(), &CommitDate::default()));
    }
}
