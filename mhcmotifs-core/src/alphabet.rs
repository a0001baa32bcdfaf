use std::fmt::{self, Display};

use crate::consts::STANDARD_AMINO_ACIDS;
use crate::errors::CoreError;

///
/// An ordered amino-acid alphabet.
///
/// The order is significant: it fixes the amino-acid-minor axis of every
/// motif vector, so every allele compared in one run must share one alphabet.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidAlphabet {
    symbols: Vec<char>,
    lookup: [Option<usize>; 128],
}

impl AminoAcidAlphabet {
    /// The twenty standard amino acids, alphabetical by one-letter code.
    pub fn standard() -> Self {
        // the constant is known-good, build it without the validation round trip
        let symbols: Vec<char> = STANDARD_AMINO_ACIDS.chars().collect();
        let mut lookup = [None; 128];
        for (i, aa) in symbols.iter().enumerate() {
            lookup[*aa as usize] = Some(i);
        }
        AminoAcidAlphabet { symbols, lookup }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    ///
    /// Position of an amino acid in the alphabet, if it is a member.
    ///
    pub fn index_of(&self, amino_acid: char) -> Option<usize> {
        if amino_acid.is_ascii() {
            self.lookup[amino_acid as usize]
        } else {
            None
        }
    }

    pub fn contains(&self, amino_acid: char) -> bool {
        self.index_of(amino_acid).is_some()
    }

    ///
    /// Returns the first residue of `peptide` that is not in the alphabet.
    ///
    pub fn first_foreign_residue(&self, peptide: &str) -> Option<char> {
        peptide.chars().find(|aa| !self.contains(*aa))
    }
}

impl Default for AminoAcidAlphabet {
    fn default() -> Self {
        AminoAcidAlphabet::standard()
    }
}

impl TryFrom<&str> for AminoAcidAlphabet {
    type Error = CoreError;

    ///
    /// Build an alphabet from a string of one-letter codes, e.g. `"ACDEFGHIKLMNPQRSTVWY"`.
    ///
    /// Symbols are upper-cased; anything that is not an ASCII letter is rejected.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut symbols: Vec<char> = Vec::with_capacity(value.len());
        let mut lookup = [None; 128];

        for raw in value.chars().filter(|c| !c.is_whitespace()) {
            if !raw.is_ascii_alphabetic() {
                return Err(CoreError::InvalidAminoAcid(raw.to_string()));
            }
            let aa = raw.to_ascii_uppercase();
            if lookup[aa as usize].is_some() {
                return Err(CoreError::DuplicateAminoAcid(aa));
            }
            lookup[aa as usize] = Some(symbols.len());
            symbols.push(aa);
        }

        if symbols.is_empty() {
            return Err(CoreError::EmptyAlphabet);
        }

        Ok(AminoAcidAlphabet { symbols, lookup })
    }
}

impl Display for AminoAcidAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for aa in &self.symbols {
            write!(f, "{}", aa)?;
        }
        Ok(())
    }
}
