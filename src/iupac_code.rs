//! DNA alphabet helpers: IUPAC validation, normalization and complements.

/// Returns true for any single-letter IUPAC nucleotide code, either case.
#[inline(always)]
pub fn is_iupac_letter(letter: u8) -> bool {
    matches!(
        letter.to_ascii_uppercase(),
        b'A' | b'C'
            | b'G'
            | b'T'
            | b'U'
            | b'W'
            | b'S'
            | b'M'
            | b'K'
            | b'R'
            | b'Y'
            | b'B'
            | b'D'
            | b'H'
            | b'V'
            | b'N'
    )
}

#[inline(always)]
pub fn is_unambiguous_base(letter: u8) -> bool {
    matches!(letter, b'A' | b'C' | b'G' | b'T')
}

/// Watson-Crick complement of an unambiguous base. Ambiguity codes
/// collapse to `N`.
#[inline(always)]
pub fn complement(letter: u8) -> u8 {
    match letter.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => b'N',
    }
}

/// Uppercases, strips whitespace, and collapses IUPAC ambiguity codes to `N`.
/// Letters outside the IUPAC alphabet also become `N`; import tolerates them,
/// the design entry points reject them later.
pub fn normalize(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if is_unambiguous_base(upper) {
                upper
            } else {
                b'N'
            }
        })
        .collect()
}

/// Complement of a sequence, same orientation.
pub fn complement_sequence(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().map(|c| complement(*c)).collect()
}

/// Reverse complement, i.e. the other strand read 5'->3'.
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev().map(|c| complement(*c)).collect()
}
