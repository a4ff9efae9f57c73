//! Tag ordering per repository
//!
//! `latest` always leads. The remaining tags are ordered newest commit first
//! and capped, so the overview shows the few builds that matter.

use crate::model::ResolvedTag;
use chrono::{DateTime, Weekday};

/// Tag surfaced first regardless of its commit date
pub const PINNED_TAG: &str = "latest";

/// Default number of non-pinned tags kept per repository
pub const DEFAULT_TAG_LIMIT: usize = 4;

/// Layout of the commit date label after its weekday (`git log` default date format)
pub const COMMIT_DATE_FORMAT: &str = "%b %d %H:%M:%S %Y %z";

/// Unix timestamp of a commit date label, `None` when it does not parse.
///
/// The leading weekday must be a weekday name but need not match the date.
pub fn commit_timestamp(date: &str) -> Option<i64> {
    let (weekday, rest) = date.trim().split_once(' ')?;
    weekday.parse::<Weekday>().ok()?;
    DateTime::parse_from_str(rest.trim_start(), COMMIT_DATE_FORMAT)
        .ok()
        .map(|parsed| parsed.timestamp())
}

/// Order `tags` for display: pinned tags in their original order, then at
/// most `limit` other tags sorted by descending commit date.
///
/// Unparsable dates sort as the oldest possible; equal dates keep their
/// original order.
pub fn rank_tags(tags: Vec<ResolvedTag>, limit: usize) -> Vec<ResolvedTag> {
    let (mut ranked, other): (Vec<_>, Vec<_>) =
        tags.into_iter().partition(|tag| tag.name == PINNED_TAG);

    let mut dated: Vec<(Option<i64>, ResolvedTag)> = other
        .into_iter()
        .map(|tag| (commit_timestamp(&tag.provenance.date), tag))
        .collect();

    // `None` orders below every timestamp; the sort is stable.
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    dated.truncate(limit);

    ranked.extend(dated.into_iter().map(|(_, tag)| tag));
    ranked
}
