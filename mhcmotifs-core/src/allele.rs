use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::ALLELE_SLUG_STEM;

///
/// Canonical allele key, e.g. `hla_a_02_01`.
///
/// Every downstream table is keyed by this slug; the raw identifier from the
/// source dataset is never used past ingestion.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlleleSlug(String);

impl AlleleSlug {
    ///
    /// Slugify an MHC Motif Atlas allele name.
    ///
    /// The atlas writes alleles as locus letter, two-digit group and protein
    /// number run together (`A0201`). The slug adds the species stem and
    /// separates the parts: `hla_a_02_01`. Segments are cut by character
    /// position, so short identifiers yield short (possibly empty) segments
    /// rather than an error.
    ///
    /// # Arguments
    /// - raw: the allele identifier as it appears in the dataset
    pub fn from_motif_atlas(raw: &str) -> Self {
        let chars: Vec<char> = raw.trim().chars().collect();
        let segment = |from: usize, to: usize| -> String {
            let to = to.min(chars.len());
            let from = from.min(to);
            chars[from..to].iter().collect()
        };

        let slug = format!(
            "{}_{}_{}_{}",
            ALLELE_SLUG_STEM,
            segment(0, 1),
            segment(1, 3),
            segment(3, chars.len())
        );

        AlleleSlug(slug.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlleleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AlleleSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AlleleSlug {
    /// Wrap a string that is already a slug. Use [AlleleSlug::from_motif_atlas] for raw names.
    fn from(value: &str) -> Self {
        AlleleSlug(value.to_string())
    }
}
