//! Plasmid annotations and their ordering.
//!
//! An [`Annotation`] is the engine-side view of a GenBank feature: a
//! 1-based inclusive span plus display metadata. The reconciler rewrites
//! spans after edits; everything else is carried along untouched.

use crate::feature_location::{feature_is_reverse, feature_ranges_sorted_i64};
use gb_io::seq::Feature;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directionality {
    Forward,
    Reverse,
    Both,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable unique key within one plasmid.
    pub id: String,
    pub label: String,
    /// GenBank feature key, e.g. "CDS" or "misc_feature".
    pub kind: String,
    /// 1-based inclusive; `span.0 <= span.1`.
    pub span: (usize, usize),
    pub directionality: Option<Directionality>,
    pub color: Option<String>,
    pub note: String,
    pub translation: Option<String>,
}

impl Annotation {
    pub fn new(id: &str, label: &str, kind: &str, span: (usize, usize)) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
            span,
            directionality: None,
            color: None,
            note: String::new(),
            translation: None,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.span.1 - self.span.0 + 1
    }

    pub fn is_empty(&self) -> bool {
        false // a span is always at least one base
    }

    /// Maps a GenBank feature to an annotation. Multi-range locations
    /// (joins) collapse to their outer bounds; features without usable
    /// coordinates are skipped.
    pub fn from_genbank_feature(feature: &Feature, fallback_id: &str) -> Option<Self> {
        let ranges = feature_ranges_sorted_i64(feature);
        let start = ranges.iter().map(|(from, _)| *from).min()?;
        let end = ranges.iter().map(|(_, to)| *to).max()?;
        // gb-io ranges are 0-based end-exclusive
        let span = (start as usize + 1, end as usize);
        if span.0 > span.1 {
            return None;
        }

        let first_qualifier = |keys: &[&str]| -> Option<String> {
            keys.iter().find_map(|key| {
                feature
                    .qualifier_values((*key).into())
                    .next()
                    .map(|v| v.to_string())
            })
        };

        let kind = feature.kind.to_string();
        let label = first_qualifier(&["label", "gene", "product"]).unwrap_or_else(|| kind.clone());
        let directionality = if feature_is_reverse(feature) {
            Some(Directionality::Reverse)
        } else {
            Some(Directionality::Forward)
        };

        Some(Self {
            id: fallback_id.to_string(),
            label,
            kind,
            span,
            directionality,
            color: first_qualifier(&["ApEinfo_fwdcolor", "color"]),
            note: first_qualifier(&["note"]).unwrap_or_default(),
            translation: first_qualifier(&["translation"]),
        })
    }
}

/// Stable ascending sort by span start, then span end. Idempotent.
pub fn sort_by_span(annotations: &mut [Annotation]) {
    annotations.sort_by(|a, b| a.span.0.cmp(&b.span.0).then(a.span.1.cmp(&b.span.1)));
}

/// Produces an id not yet present in `annotations`, in the
/// "misc_feature", "misc_feature2", "misc_feature3", ... scheme.
pub fn unique_annotation_id(annotations: &[Annotation], base: &str) -> String {
    let mut candidate = base.to_string();
    let mut counter = 2;
    while annotations.iter().any(|a| a.id == candidate) {
        candidate = format!("{base}{counter}");
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_io::seq::{FeatureKind, Location};

    fn make_feature(location: Location, qualifiers: Vec<(&str, &str)>) -> Feature {
        Feature {
            kind: FeatureKind::from("CDS"),
            location,
            qualifiers: qualifiers
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.to_string())))
                .collect(),
        }
    }

    #[test]
    fn test_from_genbank_feature_span_and_label() {
        let feature = make_feature(Location::simple_range(99, 200), vec![("label", "lacZ")]);
        let ann = Annotation::from_genbank_feature(&feature, "f1").unwrap();
        assert_eq!(ann.span, (100, 200));
        assert_eq!(ann.label, "lacZ");
        assert_eq!(ann.kind, "CDS");
        assert_eq!(ann.directionality, Some(Directionality::Forward));
    }

    #[test]
    fn test_from_genbank_feature_reverse_strand() {
        let feature = make_feature(
            Location::Complement(Box::new(Location::simple_range(10, 20))),
            vec![],
        );
        let ann = Annotation::from_genbank_feature(&feature, "f1").unwrap();
        assert_eq!(ann.directionality, Some(Directionality::Reverse));
        // label falls back to the feature kind
        assert_eq!(ann.label, "CDS");
    }

    #[test]
    fn test_sort_by_span_is_idempotent() {
        let mut annotations = vec![
            Annotation::new("c", "c", "misc_feature", (50, 60)),
            Annotation::new("a", "a", "misc_feature", (10, 30)),
            Annotation::new("b", "b", "misc_feature", (10, 20)),
        ];
        sort_by_span(&mut annotations);
        let once: Vec<String> = annotations.iter().map(|a| a.id.clone()).collect();
        assert_eq!(once, vec!["b", "a", "c"]);
        sort_by_span(&mut annotations);
        let twice: Vec<String> = annotations.iter().map(|a| a.id.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unique_annotation_id() {
        let annotations = vec![
            Annotation::new("misc_feature", "x", "misc_feature", (1, 2)),
            Annotation::new("misc_feature2", "y", "misc_feature", (3, 4)),
        ];
        assert_eq!(
            unique_annotation_id(&annotations, "misc_feature"),
            "misc_feature3"
        );
        assert_eq!(unique_annotation_id(&[], "misc_feature"), "misc_feature");
    }
}
