use ptagcore::{
    filter::TagFilter,
    tag::{
        Tag,
        Tags,
    },
};

use crate::model::TagEntry;

#[derive(Debug, PartialEq)]
pub(crate) enum PageOutcome {
    More,
    Done,
    Capped,
}

/// Accumulates accepted tags across pages; `absorb` reports after each
/// page whether another one should be requested.
pub(crate) struct TagPager<'a> {
    filter: &'a TagFilter,
    cap: usize,
    per_page: usize,
    page: u32,
    accepted: Vec<Tag>,
}

impl<'a> TagPager<'a> {
    pub(crate) fn new(filter: &'a TagFilter, cap: usize, per_page: usize) -> Self {
        Self {
            filter,
            cap,
            per_page,
            page: 0,
            accepted: Vec::new(),
        }
    }

    pub(crate) fn next_page(&self) -> u32 {
        self.page + 1
    }

    pub(crate) fn absorb(
        &mut self,
        entries: Vec<TagEntry>,
        has_next: bool,
    ) -> PageOutcome {
        self.page += 1;
        let count = entries.len();
        for entry in entries {
            if entry.commit.sha.is_empty() {
                debug!("skipping tag {:?} without a commit", entry.name);
                continue;
            }
            if !self.filter.matches(&entry.name) {
                continue;
            }
            self.accepted.push(Tag::new(entry.name, entry.commit.sha));
            if self.accepted.len() >= self.cap {
                return PageOutcome::Capped;
            }
        }
        if count < self.per_page || !has_next {
            PageOutcome::Done
        }
        else {
            PageOutcome::More
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.accepted.len()
    }

    pub(crate) fn into_tags(self) -> Tags {
        self.accepted.into()
    }
}

#[cfg(test)]
mod test {
    use crate::model::CommitSha;
    use super::*;

    fn entries(names: &[&str]) -> Vec<TagEntry> {
        names.iter()
            .map(|name| TagEntry {
                name: name.to_string(),
                commit: CommitSha { sha: format!("{name}-sha") },
            })
            .collect()
    }

    #[test]
    fn filters_and_skips_empty_commits() {
        let filter = TagFilter::new(|name| name.starts_with('v'));
        let mut pager = TagPager::new(&filter, 10, 4);
        let mut page = entries(&["v1", "x1", "v2", "v3"]);
        page[2].commit.sha = String::new();
        assert_eq!(pager.next_page(), 1);
        assert_eq!(pager.absorb(page, true), PageOutcome::More);
        assert_eq!(pager.next_page(), 2);
        assert_eq!(pager.absorb(entries(&["v4"]), false), PageOutcome::Done);
        let tags = pager.into_tags();
        let names = tags.iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["v1", "v3", "v4"]);
        assert_eq!(tags[0].commit_id, "v1-sha");
    }

    #[test]
    fn short_or_last_page_is_done() {
        let filter = TagFilter::default();
        let mut pager = TagPager::new(&filter, 10, 2);
        assert_eq!(pager.absorb(entries(&["a"]), true), PageOutcome::Done);
        let mut pager = TagPager::new(&filter, 10, 2);
        assert_eq!(pager.absorb(entries(&["a", "b"]), false), PageOutcome::Done);
        let mut pager = TagPager::new(&filter, 10, 2);
        assert_eq!(pager.absorb(vec![], true), PageOutcome::Done);
    }

    #[test]
    fn stops_at_cap() {
        let filter = TagFilter::default();
        let mut pager = TagPager::new(&filter, 3, 2);
        assert_eq!(pager.absorb(entries(&["a", "b"]), true), PageOutcome::More);
        assert_eq!(pager.absorb(entries(&["c", "d"]), true), PageOutcome::Capped);
        assert_eq!(pager.len(), 3);
        assert_eq!(pager.into_tags().len(), 3);
    }
}
