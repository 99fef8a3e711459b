//! Standard genetic code.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Codon to one-letter amino acid, standard code (NCBI table 1),
    /// stop codons as `*`.
    static ref CODON_TABLE: HashMap<&'static [u8], char> = {
        let mut m: HashMap<&'static [u8], char> = HashMap::new();
        m.insert(b"TTT", 'F'); m.insert(b"TTC", 'F');
        m.insert(b"TTA", 'L'); m.insert(b"TTG", 'L');
        m.insert(b"CTT", 'L'); m.insert(b"CTC", 'L');
        m.insert(b"CTA", 'L'); m.insert(b"CTG", 'L');
        m.insert(b"ATT", 'I'); m.insert(b"ATC", 'I'); m.insert(b"ATA", 'I');
        m.insert(b"ATG", 'M');
        m.insert(b"GTT", 'V'); m.insert(b"GTC", 'V');
        m.insert(b"GTA", 'V'); m.insert(b"GTG", 'V');
        m.insert(b"TCT", 'S'); m.insert(b"TCC", 'S');
        m.insert(b"TCA", 'S'); m.insert(b"TCG", 'S');
        m.insert(b"AGT", 'S'); m.insert(b"AGC", 'S');
        m.insert(b"CCT", 'P'); m.insert(b"CCC", 'P');
        m.insert(b"CCA", 'P'); m.insert(b"CCG", 'P');
        m.insert(b"ACT", 'T'); m.insert(b"ACC", 'T');
        m.insert(b"ACA", 'T'); m.insert(b"ACG", 'T');
        m.insert(b"GCT", 'A'); m.insert(b"GCC", 'A');
        m.insert(b"GCA", 'A'); m.insert(b"GCG", 'A');
        m.insert(b"TAT", 'Y'); m.insert(b"TAC", 'Y');
        m.insert(b"TAA", '*'); m.insert(b"TAG", '*'); m.insert(b"TGA", '*');
        m.insert(b"CAT", 'H'); m.insert(b"CAC", 'H');
        m.insert(b"CAA", 'Q'); m.insert(b"CAG", 'Q');
        m.insert(b"AAT", 'N'); m.insert(b"AAC", 'N');
        m.insert(b"AAA", 'K'); m.insert(b"AAG", 'K');
        m.insert(b"GAT", 'D'); m.insert(b"GAC", 'D');
        m.insert(b"GAA", 'E'); m.insert(b"GAG", 'E');
        m.insert(b"TGT", 'C'); m.insert(b"TGC", 'C');
        m.insert(b"TGG", 'W');
        m.insert(b"CGT", 'R'); m.insert(b"CGC", 'R');
        m.insert(b"CGA", 'R'); m.insert(b"CGG", 'R');
        m.insert(b"AGA", 'R'); m.insert(b"AGG", 'R');
        m.insert(b"GGT", 'G'); m.insert(b"GGC", 'G');
        m.insert(b"GGA", 'G'); m.insert(b"GGG", 'G');
        m
    };
}

/// Translates a DNA sequence in reading frame 1. Returns `None` unless
/// the sequence is a non-empty codon multiple of unambiguous bases.
pub fn translate(dna: &[u8]) -> Option<String> {
    if dna.is_empty() || dna.len() % 3 != 0 {
        return None;
    }
    dna.chunks(3)
        .map(|codon| CODON_TABLE.get(codon).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_reading_frame() {
        assert_eq!(translate(b"ATGGGCTAA"), Some("MG*".to_string()));
        assert_eq!(translate(b"ATGAAACGC"), Some("MKR".to_string()));
    }

    #[test]
    fn test_translate_rejects_partial_codons() {
        assert_eq!(translate(b""), None);
        assert_eq!(translate(b"ATGG"), None);
        assert_eq!(translate(b"ATNGGG"), None);
    }
}
