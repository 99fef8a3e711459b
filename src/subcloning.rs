//! Four-primer design for moving a fragment between plasmids.
//!
//! A two-junction subcloning reaction is two independent single-junction
//! insertions evaluated in mirrored coordinate frames. The composer
//! splices the target fragment into the destination vector to form a
//! pseudo-plasmid representing the post-operation state, designs the 5'
//! junction pair on it directly, then reverse-complements the whole
//! pseudo-plasmid and designs the 3' junction pair at the mirrored
//! coordinate. The four primers are relabeled so that the two annealing
//! to the fragment read Forward/Reverse and the two annealing to the
//! vector backbone read Vector Forward/Vector Reverse.

use crate::dna_sequence::{sanitize_dna_input, EditSpan, Plasmid};
use crate::error::DesignError;
use crate::iupac_code::reverse_complement;
use crate::primer_design::{design_set, DesignPreferences, OperationType, Primer, PrimerSet};

/// Junction coordinate of the 3' insertion after reverse-complementing a
/// pseudo-plasmid of length `len` whose fragment of length `target_len`
/// starts at the 1-based position `start`.
pub fn mirror_coordinate(len: usize, start: usize, target_len: usize) -> usize {
    (len + 2) - start - target_len
}

/// Designs the four subcloning primers for placing `target` (optionally
/// flanked by `insert5`/`insert3`) into `vector` over `edit_span`.
pub fn generate_subcloning_set(
    edit_span: EditSpan,
    vector: &Plasmid,
    target: &str,
    insert5: &str,
    insert3: &str,
    preferences: &DesignPreferences,
) -> Result<PrimerSet, DesignError> {
    let target = sanitize_dna_input(target)?;
    let insert5 = sanitize_dna_input(insert5)?;
    let insert3 = sanitize_dna_input(insert3)?;
    edit_span.validate(vector.len())?;
    vector.validate_for_design()?;
    if target.is_empty() {
        return Err(DesignError::InvalidSequence(
            "subcloning target must not be empty".to_string(),
        ));
    }

    // Post-operation state, without the flanking insertions: the fragment
    // occupies [start, start + target_len - 1].
    let pseudo_seq = vector.spliced_sequence(&edit_span, &target);
    let mut pseudo = Plasmid::from_sequence(&String::from_utf8_lossy(&pseudo_seq));
    pseudo.set_circular(vector.is_circular());

    let set5 = design_set(
        OperationType::Subcloning,
        EditSpan::insertion_before(edit_span.start),
        &pseudo,
        &insert5,
        preferences,
        preferences.hr_subcloning_tm,
        true,
    )?;

    let mut pseudo_rc =
        Plasmid::from_sequence(&String::from_utf8_lossy(&reverse_complement(&pseudo_seq)));
    pseudo_rc.set_circular(vector.is_circular());
    let junction3 = mirror_coordinate(pseudo_seq.len(), edit_span.start, target.len());
    let set3 = design_set(
        OperationType::Subcloning,
        EditSpan::insertion_before(junction3),
        &pseudo_rc,
        &reverse_complement(&insert3),
        preferences,
        preferences.hr_subcloning_tm,
        true,
    )?;

    let rename = |primer: &Primer, name: &str| -> Primer {
        Primer {
            name: name.to_string(),
            regions: primer.regions.clone(),
        }
    };
    let primers = vec![
        rename(&set5.primers[0], "Forward Primer"),
        rename(&set3.primers[0], "Reverse Primer"),
        rename(&set3.primers[1], "Vector Forward Primer"),
        rename(&set5.primers[1], "Vector Reverse Primer"),
    ];

    let mut full_insert = insert5.clone();
    full_insert.extend_from_slice(&target);
    full_insert.extend_from_slice(&insert3);
    let resulting_sequence =
        String::from_utf8_lossy(&vector.spliced_sequence(&edit_span, &full_insert)).into_owned();

    Ok(PrimerSet {
        title: "Subcloning".to_string(),
        operation: OperationType::Subcloning,
        symmetry: set5.symmetry,
        hr_length: vec![set5.hr_length[0], set3.hr_length[0]],
        hr_tm: vec![set5.hr_tm[0], set3.hr_tm[0]],
        resulting_sequence,
        primers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primer_design::RegionKind;

    fn circular(seq: &str) -> Plasmid {
        let mut plasmid = Plasmid::from_sequence(seq);
        plasmid.set_circular(true);
        plasmid
    }

    #[test]
    fn test_mirror_coordinate() {
        assert_eq!(mirror_coordinate(100, 10, 20), 72);
        // Fragment at the very start of the pseudo-plasmid mirrors to one
        // past its own end.
        assert_eq!(mirror_coordinate(50, 1, 10), 41);
    }

    #[test]
    fn test_resulting_sequence_identity() {
        let vector = circular("ATGCGTACGTTAGCCTAGGCATCGATCGGATCCAAGCTTGCATGCCTGCAGGTCGACTCT");
        let target = "G".repeat(30);
        let set = generate_subcloning_set(
            EditSpan::replacement(21, 30),
            &vector,
            &target,
            "AATT",
            "CCGG",
            &DesignPreferences::default(),
        )
        .unwrap();

        let vector_seq = vector.get_forward_string();
        let expected = format!(
            "{}AATT{}CCGG{}",
            &vector_seq[..20],
            target,
            &vector_seq[30..]
        );
        assert_eq!(set.resulting_sequence, expected);
        assert_eq!(set.hr_length.len(), 2);
        assert_eq!(set.hr_tm.len(), 2);
    }

    #[test]
    fn test_primer_labels_and_kinds() {
        let vector = circular("ATGCGTACGTTAGCCTAGGCATCGATCGGATCCAAGCTTGCATGCCTGCAGGTCGACTCT");
        let target = "GCGCGCGCATATGCGCGCATGCATGCGCGC";
        let set = generate_subcloning_set(
            EditSpan::replacement(21, 30),
            &vector,
            target,
            "",
            "",
            &DesignPreferences::default(),
        )
        .unwrap();

        let names: Vec<&str> = set.primers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Forward Primer",
                "Reverse Primer",
                "Vector Forward Primer",
                "Vector Reverse Primer"
            ]
        );
        for primer in &set.primers {
            for region in &primer.regions {
                assert!(matches!(
                    region.kind,
                    RegionKind::SubcloningHomology
                        | RegionKind::SubcloningTemplateBinding
                        | RegionKind::Insert
                ));
            }
        }
    }

    #[test]
    fn test_junction_primers_read_from_the_pseudo_plasmid() {
        // With no flanking insertions each primer is a contiguous window
        // of the (possibly reverse-complemented) pseudo-plasmid sequence.
        let vector = circular("ATGCGTACGTTAGCCTAGGCATCGATCGGATCCAAGCTTGCATGCCTGCAGGTCGACTCT");
        let target = "GCGCGCGCATATGCGCGCATGCATGCGCGC";
        let set = generate_subcloning_set(
            EditSpan::replacement(21, 30),
            &vector,
            target,
            "",
            "",
            &DesignPreferences::default(),
        )
        .unwrap();

        let vector_seq = vector.get_forward_string();
        let pseudo = format!("{}{}{}", &vector_seq[..20], target, &vector_seq[30..]);
        let doubled = pseudo.repeat(2);
        let pseudo_rc =
            String::from_utf8_lossy(&reverse_complement(pseudo.as_bytes())).repeat(2);

        // Forward and Vector Forward anneal to the top strand; Reverse
        // and Vector Reverse to the bottom strand.
        assert!(doubled.contains(&set.primers[0].sequence()));
        assert!(pseudo_rc.contains(&set.primers[1].sequence()));
        assert!(doubled.contains(&set.primers[2].sequence()));
        assert!(pseudo_rc.contains(&set.primers[3].sequence()));
    }
}
