use std::path::Path;

use log::info;
use serde::Serialize;

use mhcmotifs_core::Grade;
use mhcmotifs_distributions::GradedDistributions;

use crate::error::Result;

/// Column names of the motif table, in [MotifRow] field order.
pub const MOTIF_TABLE_COLUMNS: [&str; 7] = [
    "allele_slug",
    "position",
    "amino_acid",
    "grade",
    "percentage",
    "rounded_percentage",
    "peptide_length",
];

/// One row of the flat motif table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotifRow<'a> {
    pub allele_slug: &'a str,
    pub position: usize,
    pub amino_acid: char,
    pub grade: Grade,
    pub percentage: f64,
    pub rounded_percentage: f64,
    pub peptide_length: usize,
}

///
/// Flatten the graded motifs of one peptide length into table rows, in
/// allele, position and graded order. `percentage` is the full-precision value.
///
pub fn motif_rows(graded: &GradedDistributions, motif_length: usize) -> Vec<MotifRow<'_>> {
    graded
        .iter()
        .filter_map(|(allele, motifs)| motifs.get(&motif_length).map(|motif| (allele, motif)))
        .flat_map(move |(allele, motif)| {
            motif.positions().flat_map(move |(position, graded_position)| {
                graded_position.iter().map(move |stat| MotifRow {
                    allele_slug: allele.as_str(),
                    position,
                    amino_acid: stat.amino_acid,
                    grade: stat.grade,
                    percentage: stat.percentage,
                    rounded_percentage: stat.rounded_percentage,
                    peptide_length: motif_length,
                })
            })
        })
        .collect()
}

///
/// Write the motif table for one peptide length as CSV.
///
/// The header is always written, even when no allele has motifs of that length.
/// Returns the number of data rows written.
///
pub fn write_motif_table<P: AsRef<Path>>(
    graded: &GradedDistributions,
    motif_length: usize,
    path: P,
) -> Result<usize> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rows = motif_rows(graded, motif_length);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(MOTIF_TABLE_COLUMNS)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} motif rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use mhcmotifs_core::RawRecord;
    use mhcmotifs_distributions::{aggregate, grade, normalize};

    #[fixture]
    fn graded() -> GradedDistributions {
        let records = vec![
            RawRecord::new("A0201", "SLL"),
            RawRecord::new("A0201", "SLV"),
            RawRecord::new("A0201", "GILGFVFTL"),
        ];
        let normalized = normalize(&aggregate(&records, "H2")).unwrap();
        grade(&normalized).unwrap()
    }

    #[rstest]
    fn test_rows_follow_graded_order(graded: GradedDistributions) {
        let rows = motif_rows(&graded, 3);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].allele_slug, "hla_a_02_01");
        assert_eq!((rows[0].position, rows[0].amino_acid), (1, 'S'));
        assert_eq!((rows[2].position, rows[2].amino_acid), (3, 'L'));
        assert_eq!(rows[2].grade, Grade::High);
        assert_eq!(rows[3].percentage, 50.0);
        assert!(rows.iter().all(|r| r.peptide_length == 3));
    }

    #[rstest]
    fn test_write_motif_table(graded: GradedDistributions) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motifs.csv");

        let written = write_motif_table(&graded, 3, &path).unwrap();
        assert_eq!(written, 4);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "allele_slug,position,amino_acid,grade,percentage,rounded_percentage,peptide_length",
                "hla_a_02_01,1,S,dominant,100.0,100.0,3",
                "hla_a_02_01,2,L,dominant,100.0,100.0,3",
                "hla_a_02_01,3,L,high,50.0,50.0,3",
                "hla_a_02_01,3,V,high,50.0,50.0,3",
            ]
        );
    }

    #[rstest]
    fn test_table_keeps_full_precision_percentages() {
        let records = vec![
            RawRecord::new("B0702", "APL"),
            RawRecord::new("B0702", "RPL"),
            RawRecord::new("B0702", "SPV"),
        ];
        let graded = grade(&normalize(&aggregate(&records, "H2")).unwrap()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motifs.csv");
        write_motif_table(&graded, 3, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let third_position: Vec<&str> = content
            .lines()
            .filter(|line| line.starts_with("hla_b_07_02,3,"))
            .collect();
        assert_eq!(
            third_position,
            vec![
                "hla_b_07_02,3,L,dominant,66.66666666666666,66.7,3",
                "hla_b_07_02,3,V,high,33.33333333333333,33.3,3",
            ]
        );
    }

    #[rstest]
    fn test_missing_length_writes_header_only(graded: GradedDistributions) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motifs.csv");

        assert_eq!(write_motif_table(&graded, 10, &path).unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "allele_slug,position,amino_acid,grade,percentage,rounded_percentage,peptide_length\n"
        );
    }
}
