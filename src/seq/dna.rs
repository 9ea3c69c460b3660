use bio::alphabets::dna;

/// Complements a single base. IUPAC codes are paired with their complements and case is
/// preserved; anything outside the alphabet is returned unchanged.
#[inline(always)]
pub fn complement(base: char) -> char {
    if base.is_ascii() {
        dna::complement(base as u8) as char
    } else {
        base
    }
}

/// Reverse complement of a sequence string.
pub fn revcomp(seq: &str) -> String {
    seq.chars().rev().map(complement).collect()
}
