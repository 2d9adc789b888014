//! Revision selector: which revisions are old enough to act on.
//!
//! This module is the core "judgment logic" of the tool. Everything here is a
//! pure function over already-fetched revisions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::Revision;

/// Decide whether one revision falls outside the retention window.
///
/// - no `registered_at`: never eligible (age cannot be judged)
/// - active: eligible iff `registered_at <= threshold`
/// - inactive: eligible iff `deregistered_at <= threshold`
pub fn is_eligible(revision: &Revision, threshold: DateTime<Utc>) -> bool {
    match (revision.registered_at, revision.deregistered_at) {
        (None, _) => false,
        (Some(registered_at), None) => registered_at <= threshold,
        (Some(_), Some(deregistered_at)) => deregistered_at <= threshold,
    }
}

/// Stable filter of `revisions` by [`is_eligible`]. Input order is kept.
pub fn eligible(revisions: Vec<Revision>, threshold: DateTime<Utc>) -> Vec<Revision> {
    revisions
        .into_iter()
        .filter(|revision| is_eligible(revision, threshold))
        .collect()
}

/// Group revisions by family, each group sorted by revision number ascending.
///
/// Registry listing order is not trusted, so groups are always re-sorted.
pub fn group_by_family(revisions: Vec<Revision>) -> BTreeMap<String, Vec<Revision>> {
    revisions
        .into_iter()
        .fold(BTreeMap::new(), |mut groups: BTreeMap<String, Vec<Revision>>, revision| {
            groups.entry(revision.family.clone()).or_default().push(revision);
            groups
        })
        .into_iter()
        .map(|(family, mut group)| {
            group.sort_by_key(|revision| revision.revision);
            (family, group)
        })
        .collect()
}

/// Drop the numerically newest revision of every family.
///
/// A family with a single member disappears entirely. The result is ordered by
/// family name, then revision number.
pub fn exclude_latest_per_family(revisions: Vec<Revision>) -> Vec<Revision> {
    group_by_family(revisions)
        .into_values()
        .flat_map(|group| {
            let latest = group.last().map(|revision| revision.revision);
            group
                .into_iter()
                .filter(move |revision| Some(revision.revision) != latest)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn active(family: &str, revision: u32, registered_days_ago: i64) -> Revision {
        Revision::new(format!("arn:{family}:{revision}"), family, revision)
            .with_registered_at(days_ago(registered_days_ago))
    }

    fn revisions_of(revisions: &[Revision]) -> Vec<(String, u32)> {
        revisions
            .iter()
            .map(|r| (r.family.clone(), r.revision))
            .collect()
    }

    #[rstest]
    #[case::no_timestamps(None, None, false)]
    #[case::deregistered_without_registered_at(None, Some(30), false)]
    #[case::active_older_than_threshold(Some(10), None, true)]
    #[case::active_exactly_at_threshold(Some(7), None, true)]
    #[case::active_newer_than_threshold(Some(5), None, false)]
    #[case::inactive_deregistered_long_ago(Some(1), Some(10), true)]
    #[case::inactive_deregistered_at_threshold(Some(30), Some(7), true)]
    #[case::inactive_deregistered_recently(Some(30), Some(3), false)]
    fn eligibility_rules(
        #[case] registered_days_ago: Option<i64>,
        #[case] deregistered_days_ago: Option<i64>,
        #[case] expected: bool,
    ) {
        let threshold = days_ago(7);
        let revision = Revision {
            registered_at: registered_days_ago.map(days_ago),
            deregistered_at: deregistered_days_ago.map(days_ago),
            ..Revision::new("arn:svc:1", "svc", 1)
        };

        assert_eq!(is_eligible(&revision, threshold), expected);
    }

    #[test]
    fn zero_retention_selects_everything_registered() {
        let revisions = vec![active("svc", 2, 5), active("svc", 1, 10)];
        let selected = eligible(revisions.clone(), now());
        assert_eq!(selected, revisions);
    }

    #[test]
    fn seven_day_retention_keeps_recent_revisions() {
        let revisions = vec![active("svc", 2, 5), active("svc", 1, 10)];
        let selected = eligible(revisions, days_ago(7));
        assert_eq!(revisions_of(&selected), vec![("svc".to_string(), 1)]);
    }

    #[test]
    fn eligible_preserves_input_order() {
        let revisions = vec![
            active("b", 3, 20),
            active("a", 1, 20),
            active("b", 1, 20),
            active("a", 9, 1),
        ];
        let selected = eligible(revisions, days_ago(7));
        assert_eq!(
            revisions_of(&selected),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 1),
                ("b".to_string(), 1)
            ]
        );
    }

    #[test]
    fn group_by_family_sorts_numerically() {
        let groups = group_by_family(vec![
            active("svc", 10, 1),
            active("svc", 9, 1),
            active("api", 2, 1),
            active("svc", 100, 1),
        ]);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["api", "svc"]);
        let svc: Vec<u32> = groups["svc"].iter().map(|r| r.revision).collect();
        assert_eq!(svc, vec![9, 10, 100]);
    }

    #[test]
    fn latest_revision_is_excluded() {
        let selected = eligible(vec![active("svc", 1, 10), active("svc", 2, 5)], now());
        let targets = exclude_latest_per_family(selected);
        assert_eq!(revisions_of(&targets), vec![("svc".to_string(), 1)]);
    }

    #[test]
    fn single_member_family_vanishes() {
        let targets = exclude_latest_per_family(vec![active("solo", 4, 100)]);
        assert!(targets.is_empty());
    }

    #[test]
    fn latest_is_numeric_not_positional() {
        // The registry listed revision 10 before 9.
        let targets = exclude_latest_per_family(vec![
            active("svc", 10, 30),
            active("svc", 9, 30),
            active("svc", 2, 30),
        ]);
        assert_eq!(
            revisions_of(&targets),
            vec![("svc".to_string(), 2), ("svc".to_string(), 9)]
        );
    }

    #[test]
    fn families_are_independent() {
        let targets = exclude_latest_per_family(vec![
            active("web", 1, 30),
            active("batch", 7, 30),
            active("web", 2, 30),
            active("web", 3, 30),
        ]);
        assert_eq!(
            revisions_of(&targets),
            vec![("web".to_string(), 1), ("web".to_string(), 2)]
        );
    }

    #[test]
    fn exclude_latest_of_nothing_is_nothing() {
        assert!(exclude_latest_per_family(Vec::new()).is_empty());
    }
}
