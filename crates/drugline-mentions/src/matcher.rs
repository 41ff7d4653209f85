//! Drug mention search: case-insensitive substring matching of drug names
//! against publication search text

use crate::combine::TableDataset;
use crate::model::{DrugMention, DrugRecord, PublicationRecord, PublicationRef, VenueMention};

/// Find, for every drug, the publications whose search text contains the
/// drug name, ignoring case.
///
/// Output follows the drugs' record order; publication tables are searched
/// in the given order and records within a table in their own order. Drugs
/// with no match at all are left out. Every searched table gets a key in
/// each emitted mention, even when it contributed no match.
pub fn find_mentions(drugs: &TableDataset, publications: &[&TableDataset]) -> Vec<DrugMention> {
    let drugs = DrugRecord::from_dataset(drugs);
    let tables: Vec<(&str, Vec<PublicationRecord>)> = publications
        .iter()
        .map(|dataset| (dataset.table(), PublicationRecord::from_dataset(dataset)))
        .collect();

    let mentions: Vec<DrugMention> = drugs
        .iter()
        .filter_map(|drug| mentions_of(drug, &tables))
        .collect();

    log::debug!(
        "{} of {} drugs mentioned across {} publication tables",
        mentions.len(),
        drugs.len(),
        tables.len()
    );
    mentions
}

fn mentions_of(drug: &DrugRecord, tables: &[(&str, Vec<PublicationRecord>)]) -> Option<DrugMention> {
    let folded_name = drug.name.to_lowercase();
    let mut journal = Vec::new();
    let mut per_table = Vec::with_capacity(tables.len());

    for (table, publications) in tables {
        let mut refs = Vec::new();
        for publication in publications.iter().filter(|p| p.mentions(&folded_name)) {
            refs.push(PublicationRef {
                id: publication.id.clone(),
                date: publication.date.clone(),
            });
            journal.push(VenueMention {
                name: publication.venue.clone(),
                date: publication.date.clone(),
            });
        }
        per_table.push((table.to_string(), refs));
    }

    if journal.is_empty() {
        return None;
    }
    Some(DrugMention {
        drug: drug.code.clone(),
        tables: per_table,
        journal,
    })
}
