//! Annotation reconciliation after a simulated edit.
//!
//! Once primers are designed the edit is applied to the plasmid snapshot
//! and every existing annotation's span must be remapped: annotations
//! after the edit shift, annotations containing it stretch, annotations
//! overlapping either edge are dropped entirely (a truncated feature is
//! no longer the feature it claims to be). Non-deletion edits also gain
//! a new annotation over the inserted bases.

use crate::annotation::{sort_by_span, unique_annotation_id, Annotation};
use crate::dna_sequence::{sanitize_dna_input, EditSpan, Plasmid};
use crate::error::DesignError;
use crate::genetic_code::translate;
use crate::primer_design::OperationType;
use serde::{Deserialize, Serialize};

/// What happens to one annotation span when the edit is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapDecision {
    /// Both endpoints move by the edit's length difference.
    Shift,
    /// The edit falls within the span; only the end moves.
    Inside,
    /// The span is destroyed by the edit.
    Delete,
    /// The span is unaffected.
    Untouched,
}

/// Classifies `span` (1-based inclusive) against the edit.
pub fn classify_overlap(edit: &EditSpan, span: (usize, usize)) -> OverlapDecision {
    let (span_start, span_end) = span;
    if edit.is_insertion() {
        let pos = edit.start;
        return if pos <= span_start {
            OverlapDecision::Shift
        } else if pos <= span_end {
            OverlapDecision::Inside
        } else {
            OverlapDecision::Untouched
        };
    }

    if (edit.start, edit.end) == span {
        OverlapDecision::Delete
    } else if edit.start >= span_start && edit.end <= span_end {
        OverlapDecision::Inside
    } else if edit.end < span_start {
        OverlapDecision::Shift
    } else if edit.start > span_end {
        OverlapDecision::Untouched
    } else {
        // Overlapping one edge or enclosing the whole span.
        OverlapDecision::Delete
    }
}

/// Applies the edit to `plasmid`: splices the sequence, remaps every
/// annotation span, appends the new annotation for non-deletion edits
/// and re-sorts the collection ascending by span start.
pub fn reconcile(
    operation: OperationType,
    edit_span: EditSpan,
    insert: &str,
    plasmid: &Plasmid,
) -> Result<Plasmid, DesignError> {
    let insert = sanitize_dna_input(insert)?;
    edit_span.validate(plasmid.len())?;

    let shift = insert.len() as i64 - edit_span.edited_len() as i64;
    let mut annotations: Vec<Annotation> = plasmid
        .annotations()
        .iter()
        .filter_map(|annotation| {
            // A "source" annotation describes the whole record, not a
            // sequence-local feature.
            if annotation.kind == "source" {
                return Some(annotation.clone());
            }
            match classify_overlap(&edit_span, annotation.span) {
                OverlapDecision::Untouched => Some(annotation.clone()),
                OverlapDecision::Delete => None,
                OverlapDecision::Shift => {
                    let mut shifted = annotation.clone();
                    shifted.span = (
                        (annotation.span.0 as i64 + shift) as usize,
                        (annotation.span.1 as i64 + shift) as usize,
                    );
                    Some(shifted)
                }
                OverlapDecision::Inside => {
                    let mut stretched = annotation.clone();
                    stretched.span.1 = (annotation.span.1 as i64 + shift) as usize;
                    Some(stretched)
                }
            }
        })
        .collect();

    if operation != OperationType::Deletion && !insert.is_empty() {
        let id = unique_annotation_id(&annotations, "misc_feature");
        let span = (edit_span.start, edit_span.start + insert.len() - 1);
        let mut annotation = Annotation::new(&id, operation.label(), "misc_feature", span);
        annotation.translation = translate(&insert);
        annotations.push(annotation);
    }
    sort_by_span(&mut annotations);

    let mut edited = Plasmid::from_sequence(&String::from_utf8_lossy(
        &plasmid.spliced_sequence(&edit_span, &insert),
    ));
    edited.set_circular(plasmid.is_circular());
    if let Some(name) = plasmid.name() {
        edited.set_name(name);
    }
    edited.set_annotations(annotations);
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plasmid_with_feature(len: usize, span: (usize, usize)) -> Plasmid {
        let mut plasmid = Plasmid::from_sequence(&"ACGT".repeat(len / 4 + 1)[..len].to_string());
        plasmid.set_circular(true);
        plasmid.push_annotation(Annotation::new("f1", "gene-x", "CDS", span));
        plasmid
    }

    // Literal classification scenarios: feature [20, 30] in 100 bp.
    #[test]
    fn test_classify_pure_insertions() {
        let span = (20, 30);
        assert_eq!(
            classify_overlap(&EditSpan::insertion_before(40), span),
            OverlapDecision::Untouched
        );
        assert_eq!(
            classify_overlap(&EditSpan::insertion_before(10), span),
            OverlapDecision::Shift
        );
        assert_eq!(
            classify_overlap(&EditSpan::insertion_before(20), span),
            OverlapDecision::Shift
        );
        assert_eq!(
            classify_overlap(&EditSpan::insertion_before(25), span),
            OverlapDecision::Inside
        );
        assert_eq!(
            classify_overlap(&EditSpan::insertion_before(30), span),
            OverlapDecision::Inside
        );
    }

    #[test]
    fn test_classify_replacements() {
        let span = (20, 30);
        assert_eq!(
            classify_overlap(&EditSpan::replacement(20, 30), span),
            OverlapDecision::Delete
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(22, 28), span),
            OverlapDecision::Inside
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(5, 10), span),
            OverlapDecision::Shift
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(15, 25), span),
            OverlapDecision::Delete
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(15, 35), span),
            OverlapDecision::Delete
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(25, 35), span),
            OverlapDecision::Delete
        );
        assert_eq!(
            classify_overlap(&EditSpan::replacement(40, 50), span),
            OverlapDecision::Untouched
        );
    }

    #[test]
    fn test_reconcile_length_identity() {
        let plasmid = plasmid_with_feature(100, (20, 30));
        let edited = reconcile(
            OperationType::Insertion,
            EditSpan::replacement(40, 49),
            "ATG",
            &plasmid,
        )
        .unwrap();
        assert_eq!(edited.len(), 100 - 10 + 3);
    }

    #[test]
    fn test_reconcile_shifts_downstream_feature() {
        let plasmid = plasmid_with_feature(100, (50, 60));
        let edited = reconcile(
            OperationType::Insertion,
            EditSpan::insertion_before(10),
            "ATGATG",
            &plasmid,
        )
        .unwrap();
        let gene = edited
            .annotations()
            .iter()
            .find(|a| a.label == "gene-x")
            .unwrap();
        assert_eq!(gene.span, (56, 66));
    }

    #[test]
    fn test_reconcile_stretches_containing_feature() {
        let plasmid = plasmid_with_feature(100, (20, 60));
        let edited = reconcile(
            OperationType::Insertion,
            EditSpan::insertion_before(40),
            "ATG",
            &plasmid,
        )
        .unwrap();
        let gene = edited
            .annotations()
            .iter()
            .find(|a| a.label == "gene-x")
            .unwrap();
        assert_eq!(gene.span, (20, 63));
    }

    #[test]
    fn test_reconcile_adds_labeled_and_translated_annotation() {
        let plasmid = plasmid_with_feature(100, (20, 30));
        let edited = reconcile(
            OperationType::Mutation,
            EditSpan::insertion_before(50),
            "ATGGGCTAA",
            &plasmid,
        )
        .unwrap();
        let added = edited
            .annotations()
            .iter()
            .find(|a| a.label == "Mutation")
            .unwrap();
        assert_eq!(added.span, (50, 58));
        assert_eq!(added.translation.as_deref(), Some("MG*"));
        assert_eq!(added.kind, "misc_feature");
    }

    #[test]
    fn test_reconcile_deletion_adds_nothing_and_deletes_overlap() {
        let plasmid = plasmid_with_feature(100, (20, 30));
        let edited = reconcile(
            OperationType::Deletion,
            EditSpan::replacement(25, 35),
            "",
            &plasmid,
        )
        .unwrap();
        assert_eq!(edited.len(), 89);
        assert!(edited.annotations().is_empty());
    }

    #[test]
    fn test_source_annotation_is_never_touched() {
        let mut plasmid = plasmid_with_feature(100, (20, 30));
        plasmid.push_annotation(Annotation::new("src", "whole record", "source", (1, 100)));
        let edited = reconcile(
            OperationType::Deletion,
            EditSpan::replacement(20, 30),
            "",
            &plasmid,
        )
        .unwrap();
        let source = edited
            .annotations()
            .iter()
            .find(|a| a.kind == "source")
            .unwrap();
        assert_eq!(source.span, (1, 100));
    }

    #[test]
    fn test_insertion_then_deletion_round_trip() {
        let plasmid = plasmid_with_feature(100, (20, 30));
        let original_sequence = plasmid.get_forward_string();
        let inserted = reconcile(
            OperationType::Insertion,
            EditSpan::insertion_before(50),
            "ATGGGC",
            &plasmid,
        )
        .unwrap();
        let restored = reconcile(
            OperationType::Deletion,
            EditSpan::replacement(50, 55),
            "",
            &inserted,
        )
        .unwrap();
        assert_eq!(restored.get_forward_string(), original_sequence);
        // The feature untouched by both edits survives with its original span.
        let gene = restored
            .annotations()
            .iter()
            .find(|a| a.label == "gene-x")
            .unwrap();
        assert_eq!(gene.span, (20, 30));
    }

    #[test]
    fn test_annotations_sorted_after_reconcile() {
        let mut plasmid = plasmid_with_feature(100, (70, 80));
        plasmid.push_annotation(Annotation::new("f2", "late", "CDS", (85, 90)));
        let edited = reconcile(
            OperationType::Insertion,
            EditSpan::insertion_before(10),
            "ATG",
            &plasmid,
        )
        .unwrap();
        let starts: Vec<usize> = edited.annotations().iter().map(|a| a.span.0).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }
}
