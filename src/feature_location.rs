//! GenBank location helpers: outer coordinate ranges and strand votes.

use gb_io::seq::{Feature, Location};

fn collect_strands(location: &Location, reverse: bool, strands: &mut Vec<bool>) {
    match location {
        Location::Range(_, _) | Location::Between(_, _) => strands.push(reverse),
        Location::Complement(inner) => collect_strands(inner, !reverse, strands),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_strands(part, reverse, strands);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_strands(loc, reverse, strands);
            }
        }
        Location::Gap(_) => {}
    }
}

/// Majority vote over the location's parts; an empty location counts as forward.
pub fn feature_is_reverse(feature: &Feature) -> bool {
    let mut strands = Vec::new();
    collect_strands(&feature.location, false, &mut strands);
    if strands.is_empty() {
        false
    } else {
        strands.iter().filter(|is_reverse| **is_reverse).count() > strands.len() / 2
    }
}

fn collect_ranges(location: &Location, ranges: &mut Vec<(i64, i64)>) {
    match location {
        Location::Range((from, _), (to, _)) | Location::Between(from, to) => {
            if *from < 0 || *to < 0 {
                return;
            }
            let (start, end) = if to < from { (*to, *from) } else { (*from, *to) };
            ranges.push((start, end));
        }
        Location::Complement(inner) => collect_ranges(inner, ranges),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_ranges(part, ranges);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_ranges(loc, ranges);
            }
        }
        Location::Gap(_) => {}
    }
}

/// All (start, end) coordinate pairs of a feature location, 0-based
/// end-exclusive, sorted ascending. Falls back to the location's outer
/// bounds when no explicit ranges are present.
pub fn feature_ranges_sorted_i64(feature: &Feature) -> Vec<(i64, i64)> {
    let mut ranges = Vec::new();
    collect_ranges(&feature.location, &mut ranges);
    if ranges.is_empty() {
        if let Ok((from, to)) = feature.location.find_bounds() {
            if from >= 0 && to >= 0 {
                let (start, end) = if to < from { (to, from) } else { (from, to) };
                ranges.push((start, end));
            }
        }
    }
    ranges.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    ranges
}
