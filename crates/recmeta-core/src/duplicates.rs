//! Duplicate-recording detection over normalized title clusters.
//!
//! A title entry holding several records is a candidate: those records may be
//! redundant copies of one recording. Each enabled [`DuplicateConfig`] filter
//! is checked for every pair of records in the cluster and the filters are
//! combined with AND. The cluster is then partitioned greedily in record
//! order: the first unassigned record anchors a group made of itself and every
//! still-unassigned record related to it. Groups of two or more are accepted;
//! anchors that found nobody are rejected.
//!
//! The greedy scan is order dependent. A later member of an accepted group is
//! only known to be related to the anchor, not to the other members.
//!
//! The album filter has the opposite polarity to the others: identical albums
//! disqualify a pair, so two copies of a track on the same album are not
//! reported as duplicates.
use serde::Serialize;

use crate::config::DuplicateConfig;
use crate::entry_set::EntrySet;
use crate::record::Recording;

/// A set of records presumed to be copies of one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Title of the cluster the group came from.
    pub title: String,
    /// Record indices, anchor first.
    pub records: Vec<usize>,
}

/// Records of a title cluster that matched no peer under the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedCluster {
    /// Title of the cluster.
    pub title: String,
    /// Records that joined no group.
    pub rejected: Vec<usize>,
    /// Records of the same cluster that were accepted into some group.
    pub accepted: Vec<usize>,
}

/// Outcome of duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateResolution {
    /// Accepted groups, in title order.
    pub accepted: Vec<DuplicateGroup>,
    /// Clusters with at least one rejected record, in title order.
    pub rejected: Vec<RejectedCluster>,
    /// Number of records in accepted groups.
    pub affected_count: usize,
}

/// Returns `true` if durations are within `percent` of the longer one.
///
/// Integer arithmetic: the shorter duration must be at least
/// `longer - longer * percent / 100`. Two unknown durations agree; one
/// unknown duration does not.
pub fn durations_agree(a: Option<u64>, b: Option<u64>, percent: u32) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let (longer, shorter) = if a >= b { (a, b) } else { (b, a) };
            let allowance = longer.saturating_mul(u64::from(percent)) / 100;
            shorter >= longer.saturating_sub(allowance)
        }
        (None, None) => true,
        (Some(_), None) | (None, Some(_)) => false,
    }
}

/// Returns `true` if every enabled filter accepts `a` and `b` as the same
/// recording.
pub fn are_same_recording(a: &Recording, b: &Recording, filters: &DuplicateConfig) -> bool {
    if filters.check_duration
        && !durations_agree(a.duration, b.duration, filters.duration_tolerance_percent)
    {
        return false;
    }
    if filters.check_artist && a.artist != b.artist {
        return false;
    }
    if filters.check_composer && a.composer != b.composer {
        return false;
    }
    if filters.check_genre && !a.shares_genre(b) {
        return false;
    }
    if filters.check_album && a.album == b.album {
        return false;
    }
    true
}

/// Partitions the records of each multi-record title entry into accepted
/// duplicate groups and rejected singles.
///
/// `titles` should be the normalized and merged title set for `records`.
/// Record indices missing from `records` are treated as unrelated to
/// everything.
pub fn resolve_duplicates(
    records: &[Recording],
    titles: &EntrySet,
    filters: &DuplicateConfig,
) -> DuplicateResolution {
    let mut candidates: Vec<(&str, &[usize])> = titles
        .multiple_entries()
        .into_iter()
        .filter_map(|e| {
            e.value
                .as_deref()
                .map(|title| (title, e.record_indices.as_slice()))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(b.0));

    let mut resolution = DuplicateResolution::default();
    for (title, members) in candidates {
        let groups = greedy_groups(records, members, filters);

        let mut accepted: Vec<usize> = Vec::new();
        for group in groups {
            accepted.extend(&group);
            resolution.affected_count += group.len();
            resolution.accepted.push(DuplicateGroup {
                title: title.to_owned(),
                records: group,
            });
        }

        let rejected: Vec<usize> = members
            .iter()
            .copied()
            .filter(|m| !accepted.contains(m))
            .collect();
        if !rejected.is_empty() {
            resolution.rejected.push(RejectedCluster {
                title: title.to_owned(),
                rejected,
                accepted,
            });
        }
    }

    tracing::debug!(
        groups = resolution.accepted.len(),
        rejected_clusters = resolution.rejected.len(),
        affected = resolution.affected_count,
        "resolved duplicate recordings"
    );
    resolution
}

/// Greedy anchor-based grouping of one cluster.
fn greedy_groups(
    records: &[Recording],
    members: &[usize],
    filters: &DuplicateConfig,
) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; members.len()];
    let mut groups = Vec::new();

    for anchor in 0..members.len() {
        if assigned[anchor] {
            continue;
        }
        let Some(anchor_record) = records.get(members[anchor]) else {
            continue;
        };
        let mut group = vec![anchor];
        for other in (anchor + 1)..members.len() {
            if assigned[other] {
                continue;
            }
            let related = records
                .get(members[other])
                .is_some_and(|r| are_same_recording(anchor_record, r, filters));
            if related {
                group.push(other);
            }
        }
        if group.len() > 1 {
            for &slot in &group {
                assigned[slot] = true;
            }
            groups.push(group.into_iter().map(|slot| members[slot]).collect());
        }
    }
    groups
}
