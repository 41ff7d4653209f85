//! Journal ranking: which venue mentions the most distinct drugs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::DrugMention;

/// The venue with the largest set of distinct drugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRanking {
    pub name: String,
    pub drug_count: usize,
    /// Drug codes, sorted.
    pub drugs: Vec<String>,
}

/// Distinct drug codes per venue name. Empty venue names and mentions
/// without a drug code are ignored.
pub fn drugs_by_journal(mentions: &[DrugMention]) -> BTreeMap<&str, BTreeSet<&str>> {
    let mut journals: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for mention in mentions {
        if mention.drug.is_empty() {
            log::warn!(
                "mention without drug code ({} venue entries), skipped",
                mention.journal.len()
            );
            continue;
        }
        for venue in mention.journal.iter().filter(|v| !v.name.is_empty()) {
            journals
                .entry(venue.name.as_str())
                .or_default()
                .insert(mention.drug.as_str());
        }
    }
    journals
}

/// Pick the venue referenced by the most distinct drugs.
///
/// Ties go to the lexicographically smallest venue name. Returns `None`
/// when there are no mentions or no named venues.
pub fn rank_journals(mentions: &[DrugMention]) -> Option<JournalRanking> {
    if mentions.is_empty() {
        log::warn!("No drug mentions data available");
        return None;
    }

    let journals = drugs_by_journal(mentions);

    // BTreeMap iterates in name order; strict `>` keeps the first maximum
    let mut best: Option<(&str, &BTreeSet<&str>)> = None;
    for (&name, drugs) in &journals {
        let better = match best {
            None => true,
            Some((_, top)) => drugs.len() > top.len(),
        };
        if better {
            best = Some((name, drugs));
        }
    }

    let Some((name, drugs)) = best else {
        log::warn!("No valid journal mentions found in the data");
        return None;
    };

    log::info!(
        "Found journal with most drugs: {name} ({} drugs)",
        drugs.len()
    );
    Some(JournalRanking {
        name: name.to_string(),
        drug_count: drugs.len(),
        drugs: drugs.iter().map(|d| d.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VenueMention;

    fn mention(code: &str, venues: &[&str]) -> DrugMention {
        DrugMention {
            drug: code.to_string(),
            tables: Vec::new(),
            journal: venues
                .iter()
                .map(|v| VenueMention {
                    name: v.to_string(),
                    date: "2020-01-01".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn picks_journal_with_most_distinct_drugs() {
        let mentions = vec![
            mention("A1", &["J1"]),
            mention("B2", &["J1"]),
            mention("C3", &["J2"]),
        ];
        let top = rank_journals(&mentions).unwrap();
        assert_eq!(
            top,
            JournalRanking {
                name: "J1".into(),
                drug_count: 2,
                drugs: vec!["A1".into(), "B2".into()],
            }
        );
    }

    #[test]
    fn repeated_mentions_of_one_drug_count_once() {
        let mentions = vec![
            mention("A1", &["J2", "J2", "J2"]),
            mention("B2", &["J1"]),
            mention("C3", &["J1"]),
        ];
        let top = rank_journals(&mentions).unwrap();
        assert_eq!(top.name, "J1");
        assert_eq!(top.drug_count, 2);
    }

    #[test]
    fn drugs_are_sorted() {
        let mentions = vec![mention("Z1", &["J"]), mention("A9", &["J"]), mention("M5", &["J"])];
        let top = rank_journals(&mentions).unwrap();
        assert_eq!(top.drugs, vec!["A9", "M5", "Z1"]);
    }

    #[test]
    fn tie_goes_to_smallest_name() {
        let mentions = vec![mention("A1", &["Zeta"]), mention("B2", &["Alpha"])];
        assert_eq!(rank_journals(&mentions).unwrap().name, "Alpha");
    }

    #[test]
    fn empty_input_is_no_result() {
        assert_eq!(rank_journals(&[]), None);
    }

    #[test]
    fn no_named_venue_is_no_result() {
        let mentions = vec![mention("A1", &[""]), mention("", &["J1"])];
        assert_eq!(rank_journals(&mentions), None);
    }

    #[test]
    fn count_is_true_maximum() {
        let mentions = vec![
            mention("A", &["J1", "J2"]),
            mention("B", &["J2", "J3"]),
            mention("C", &["J2"]),
            mention("D", &["J3", "J1"]),
        ];
        let by_journal = drugs_by_journal(&mentions);
        let max = by_journal.values().map(|s| s.len()).max().unwrap();
        assert_eq!(rank_journals(&mentions).unwrap().drug_count, max);
        assert_eq!(max, 3);
    }
}
