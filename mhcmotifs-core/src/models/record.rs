///
/// One row of the source peptide table: the raw allele identifier and a
/// peptide it was observed to bind.
///
/// The peptide length is derived from the sequence, never stored.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub allele: String,
    pub peptide: String,
}

impl RawRecord {
    pub fn new(allele: impl Into<String>, peptide: impl Into<String>) -> Self {
        RawRecord {
            allele: allele.into(),
            peptide: peptide.into(),
        }
    }
}
