use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::{debug, info};

use mhcmotifs_core::{AminoAcidAlphabet, ConfigError, MotifsConfig, RawRecord};

use crate::error::{MotifIoError, Result};

///
/// Get a reader for either a gzip'd or a plain file, picked by extension.
///
/// # Arguments
/// - path: path to the file to read
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Parses a tab-delimited peptide table into [RawRecord]s.
///
/// Column positions, header handling and the residue alphabet come from the
/// run configuration.
///
#[derive(Debug, Clone)]
pub struct RecordReader {
    allele_column: usize,
    peptide_column: usize,
    has_header: bool,
    alphabet: AminoAcidAlphabet,
}

impl RecordReader {
    pub fn from_config(config: &MotifsConfig) -> Result<Self> {
        config.validate()?;
        let alphabet = config.alphabet().map_err(ConfigError::from)?;

        Ok(RecordReader {
            allele_column: config.allele_column,
            peptide_column: config.peptide_column,
            has_header: config.has_header,
            alphabet,
        })
    }

    fn required_columns(&self) -> usize {
        self.allele_column.max(self.peptide_column) + 1
    }

    ///
    /// Parse one line. `line_number` is 1-based and only used for errors.
    ///
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<RawRecord> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < self.required_columns() {
            return Err(MotifIoError::MalformedRecord {
                line: line_number,
                reason: format!(
                    "expected at least {} tab-separated columns, found {}",
                    self.required_columns(),
                    fields.len()
                ),
            });
        }

        let allele = fields[self.allele_column].trim();
        let peptide = fields[self.peptide_column].trim();

        if allele.is_empty() {
            return Err(MotifIoError::MalformedRecord {
                line: line_number,
                reason: "empty allele".to_string(),
            });
        }

        if peptide.is_empty() {
            return Err(MotifIoError::MalformedRecord {
                line: line_number,
                reason: "empty peptide".to_string(),
            });
        }

        if let Some(residue) = self.alphabet.first_foreign_residue(peptide) {
            return Err(MotifIoError::MalformedRecord {
                line: line_number,
                reason: format!("residue '{}' in {} is not in the amino-acid alphabet", residue, peptide),
            });
        }

        Ok(RawRecord::new(allele, peptide))
    }

    pub fn read<R: BufRead>(&self, reader: R) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if index == 0 && self.has_header {
                debug!("Skipping header: {}", line.trim_end());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            records.push(self.parse_line(line.trim_end_matches('\r'), index + 1)?);
        }

        Ok(records)
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawRecord>> {
        let path = path.as_ref();
        let records = self.read(get_dynamic_reader(path)?)?;
        info!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }
}

///
/// Read every record of a peptide table, plain or `.gz`.
///
/// # Arguments
/// - path: path to the tab-delimited table
/// - config: run configuration (columns, header, alphabet)
pub fn read_records<P: AsRef<Path>>(path: P, config: &MotifsConfig) -> Result<Vec<RawRecord>> {
    RecordReader::from_config(config)?.read_path(path)
}
