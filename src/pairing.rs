use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    key::classify,
    types::{DocumentKey, DocumentPair, FileRecord, Role},
};

/// Partial accumulator for one document key
#[derive(Default)]
struct Slots {
    structured: Option<FileRecord>,
    rendered: Option<FileRecord>,
}

/// Result of grouping filtered records into logical documents
///
/// `pairs` holds only complete documents; a key missing one role lands in
/// `incomplete` with the role that was never observed. A missing sibling is
/// an expected state (the source system may not have exported it yet), not
/// an error.
#[derive(Debug, Default)]
pub struct PairingResult {
    /// Complete pairs, in order of first appearance of the key
    pub pairs: Vec<DocumentPair>,
    /// Keys with exactly one slot filled, with the missing role
    pub incomplete: Vec<(DocumentKey, Role)>,
    /// Records whose extension matched no role; reported, never paired
    pub unknown: Vec<FileRecord>,
}

/// Group filtered file records by document key
///
/// Each record is routed into the slot matching its role. When both slots
/// for a key are filled the key yields a pair. Emission order is the order
/// of first appearance of the key in the input, which makes the output
/// deterministic for a given listing. A duplicate record for an
/// already-filled slot keeps the first occurrence.
pub fn group_records(records: Vec<FileRecord>) -> PairingResult {
    let mut slots: HashMap<DocumentKey, Slots> = HashMap::new();
    let mut order: Vec<DocumentKey> = Vec::new();
    let mut unknown = Vec::new();

    for record in records {
        let (key, role) = classify(&record.name);
        if role == Role::Unknown {
            debug!(name = %record.name, "no role for file, excluded from pairing");
            unknown.push(record);
            continue;
        }

        let entry = slots.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Slots::default()
        });

        let slot = if role == Role::StructuredData {
            &mut entry.structured
        } else {
            &mut entry.rendered
        };
        if let Some(existing) = slot {
            warn!(
                key = %key,
                kept = %existing.name,
                dropped = %record.name,
                "duplicate record for role, keeping first occurrence"
            );
        } else {
            *slot = Some(record);
        }
    }

    let mut result = PairingResult {
        unknown,
        ..Default::default()
    };

    for key in order {
        let entry = slots.remove(&key).unwrap_or_default();
        match (entry.structured, entry.rendered) {
            (Some(structured), Some(rendered)) => result.pairs.push(DocumentPair {
                key,
                structured,
                rendered,
            }),
            (Some(_), None) => result.incomplete.push((key, Role::RenderedFile)),
            (None, Some(_)) => result.incomplete.push((key, Role::StructuredData)),
            (None, None) => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: format!("/certs/{}", name),
            size: 512,
            modified_at: None,
            created_at: None,
            is_directory: false,
        }
    }

    #[test]
    fn test_complete_pair_emitted() {
        let result = group_records(vec![record("t_a.json"), record("t_a.pdf")]);

        assert_eq!(result.pairs.len(), 1);
        assert!(result.incomplete.is_empty());
        let pair = &result.pairs[0];
        assert_eq!(pair.key.as_str(), "a");
        assert_eq!(pair.structured.name, "t_a.json");
        assert_eq!(pair.rendered.name, "t_a.pdf");
    }

    #[test]
    fn test_incomplete_key_is_not_a_pair() {
        let result = group_records(vec![
            record("t_a.json"),
            record("t_a.pdf"),
            record("t_b.json"),
        ]);

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].key.as_str(), "a");
        assert_eq!(
            result.incomplete,
            vec![(DocumentKey("b".to_string()), Role::RenderedFile)]
        );
    }

    #[test]
    fn test_missing_structured_reported() {
        let result = group_records(vec![record("t_c.pdf")]);
        assert!(result.pairs.is_empty());
        assert_eq!(
            result.incomplete,
            vec![(DocumentKey("c".to_string()), Role::StructuredData)]
        );
    }

    #[test]
    fn test_unknown_records_never_pair() {
        let result = group_records(vec![
            record("t_a.json"),
            record("t_a.txt"),
            record("readme"),
        ]);

        assert!(result.pairs.is_empty());
        assert_eq!(result.incomplete.len(), 1);
        let names: Vec<_> = result.unknown.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["t_a.txt", "readme"]);
    }

    #[test]
    fn test_first_appearance_order() {
        let result = group_records(vec![
            record("t_b.json"),
            record("t_a.json"),
            record("t_a.pdf"),
            record("t_b.pdf"),
        ]);

        let keys: Vec<_> = result.pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_keeps_first_occurrence() {
        let mut second = record("t2_a.json");
        second.name = "t_a.json".to_string();
        second.path = "/certs/other/t_a.json".to_string();

        let result = group_records(vec![record("t_a.json"), second, record("t_a.pdf")]);

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].structured.path, "/certs/t_a.json");
    }

    #[test]
    fn test_compound_suffix_sibling_completes_the_pair() {
        let result = group_records(vec![record("x_abc.json"), record("x_abc.v1.pdf")]);

        assert!(result.incomplete.is_empty());
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].key.as_str(), "abc");
    }

    #[test]
    fn test_pair_iff_both_roles_present() {
        // No false pairs, no missing pairs
        let result = group_records(vec![
            record("t_x.json"),
            record("t_y.pdf"),
            record("t_z.json"),
            record("t_z.pdf"),
        ]);

        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].key.as_str(), "z");
        assert_eq!(result.incomplete.len(), 2);
    }
}
