//! Collapses NIH amendment records into one canonical record per award.
//!
//! An NIH project number such as `1R01CA123456-05` carries a leading
//! application-type digit, a core award identifier (`R01CA123456`) and a
//! support-year suffix (`05`). Records sharing a core describe the same award
//! at different amendment states; the one with the largest suffix wins.

use crate::types::AwardRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static PROJECT_NUM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+)?([A-Z0-9]+)-(\d+)$").expect("project number pattern is valid")
});

/// Splits a project number into (core, suffix). Returns `None` when the
/// identifier does not follow the `[digits]CORE-digits` shape.
pub fn split_project_num(project_num: &str) -> Option<(String, u64)> {
    let captures = PROJECT_NUM_RE.captures(project_num)?;
    let core = captures
        .get(1)?
        .as_str()
        .trim_start_matches(|c: char| c.is_ascii_digit());
    // An all-digit identifier has no core to group on
    if core.is_empty() {
        return None;
    }
    let suffix = captures.get(2)?.as_str().parse::<u64>().ok()?;
    Some((core.to_string(), suffix))
}

/// Core and suffix of a project number. Non-matching identifiers are their
/// own core with suffix 0.
pub fn core_and_suffix(project_num: &str) -> (String, u64) {
    split_project_num(project_num).unwrap_or_else(|| (project_num.to_string(), 0))
}

struct Slot {
    suffix: u64,
    record: AwardRecord,
}

/// Ordered core → record mapping holding the highest-suffix record per core.
/// Iteration follows the order in which each core was first seen.
#[derive(Default)]
pub struct DedupedProjectSet {
    slots: Vec<Slot>,
    by_core: HashMap<String, usize>,
}

impl DedupedProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record in. Records with a versioned project number replace
    /// the stored record for their core only when their suffix is strictly
    /// greater; ties keep the first-seen record. Records without a versioned
    /// project number always get a slot of their own.
    pub fn insert(&mut self, record: AwardRecord) {
        let Some((core, suffix)) = record
            .project_identifier
            .as_deref()
            .and_then(split_project_num)
        else {
            debug!(
                project_num = record.project_identifier.as_deref().unwrap_or(""),
                "Unversioned project number, keeping as unique"
            );
            self.slots.push(Slot { suffix: 0, record });
            return;
        };

        match self.by_core.get(&core) {
            Some(&idx) => {
                let slot = &mut self.slots[idx];
                if suffix > slot.suffix {
                    debug!(core = %core, old = slot.suffix, new = suffix, "Superseding amendment");
                    *slot = Slot { suffix, record };
                }
            }
            None => {
                self.by_core.insert(core, self.slots.len());
                self.slots.push(Slot { suffix, record });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AwardRecord> {
        self.slots.iter().map(|slot| &slot.record)
    }

    pub fn into_records(self) -> Vec<AwardRecord> {
        self.slots.into_iter().map(|slot| slot.record).collect()
    }
}

impl FromIterator<AwardRecord> for DedupedProjectSet {
    fn from_iter<I: IntoIterator<Item = AwardRecord>>(iter: I) -> Self {
        let mut set = DedupedProjectSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Deduplicates a response's records, keeping first-seen order of cores
pub fn dedupe_projects(records: Vec<AwardRecord>) -> Vec<AwardRecord> {
    let total = records.len();
    let set: DedupedProjectSet = records.into_iter().collect();
    debug!(total, kept = set.len(), "Deduplicated NIH projects");
    set.into_records()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Registry;

    fn project(num: Option<&str>, title: &str) -> AwardRecord {
        let mut record = AwardRecord::empty(Registry::Nih);
        record.project_identifier = num.map(str::to_string);
        record.title = Some(title.to_string());
        record
    }

    fn titles(records: &[AwardRecord]) -> Vec<&str> {
        records.iter().filter_map(|r| r.title.as_deref()).collect()
    }

    #[test]
    fn splits_versioned_project_numbers() {
        assert_eq!(core_and_suffix("1R01CA123456-05"), ("R01CA123456".to_string(), 5));
        assert_eq!(core_and_suffix("5R01CA123456-07"), ("R01CA123456".to_string(), 7));
        assert_eq!(core_and_suffix("R21AI987654-01"), ("R21AI987654".to_string(), 1));
    }

    #[test]
    fn unversioned_numbers_are_their_own_core() {
        assert_eq!(core_and_suffix("UNKNOWN"), ("UNKNOWN".to_string(), 0));
        assert_eq!(core_and_suffix(""), (String::new(), 0));
        assert_eq!(split_project_num("1R01CA123456-01A1"), None);
        assert_eq!(split_project_num("1r01ca123456-01"), None);
        assert_eq!(split_project_num("12345-01"), None);
        assert_eq!(split_project_num("1R01CA123456-99999999999999999999999"), None);
    }

    #[test]
    fn keeps_highest_suffix_in_either_order() {
        let forward = dedupe_projects(vec![
            project(Some("5R01CA123456-03"), "year 3"),
            project(Some("5R01CA123456-07"), "year 7"),
        ]);
        assert_eq!(titles(&forward), vec!["year 7"]);

        let backward = dedupe_projects(vec![
            project(Some("5R01CA123456-07"), "year 7"),
            project(Some("5R01CA123456-03"), "year 3"),
        ]);
        assert_eq!(titles(&backward), vec!["year 7"]);
    }

    #[test]
    fn equal_suffix_keeps_first_seen() {
        let kept = dedupe_projects(vec![
            project(Some("1R01CA123456-02"), "first"),
            project(Some("5R01CA123456-02"), "second"),
        ]);
        assert_eq!(titles(&kept), vec!["first"]);
    }

    #[test]
    fn one_entry_per_distinct_core() {
        let kept = dedupe_projects(vec![
            project(Some("5R01CA123456-01"), "a1"),
            project(Some("5U01HL000001-02"), "b2"),
            project(Some("5R01CA123456-04"), "a4"),
            project(Some("5U01HL000001-01"), "b1"),
            project(Some("3R01CA123456-02"), "a2"),
            project(Some("1K99AG111111-01"), "c1"),
        ]);
        assert_eq!(kept.len(), 3);
        // Cores keep their first-seen position even after replacement
        assert_eq!(titles(&kept), vec!["a4", "b2", "c1"]);
    }

    #[test]
    fn unversioned_and_missing_numbers_are_never_merged() {
        let kept = dedupe_projects(vec![
            project(Some("UNKNOWN"), "u1"),
            project(Some("UNKNOWN"), "u2"),
            project(None, "m1"),
            project(None, "m2"),
            project(Some("5R01CA123456-01"), "a1"),
        ]);
        assert_eq!(titles(&kept), vec!["u1", "u2", "m1", "m2", "a1"]);
    }

    #[test]
    fn empty_input_gives_empty_set() {
        let set: DedupedProjectSet = Vec::<AwardRecord>::new().into_iter().collect();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
