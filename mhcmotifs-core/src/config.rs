use std::fs::read_to_string;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::alphabet::AminoAcidAlphabet;
use crate::consts::*;
use crate::errors::{ConfigError, ConfigResult, CoreError};

///
/// Run configuration. Every field is optional in the TOML file and falls back
/// to the defaults below.
///
/// ```toml
/// amino_acids = "ACDEFGHIKLMNPQRSTVWY"
/// excluded_allele_marker = "H2"
/// motif_length = 9
/// min_cluster_size = 2
/// allele_column = 0
/// peptide_column = 1
/// has_header = true
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MotifsConfig {
    /// Canonical amino-acid alphabet, in feature order.
    pub amino_acids: String,
    /// Raw allele identifiers containing this marker are dropped. Empty disables exclusion.
    pub excluded_allele_marker: String,
    /// Peptide length that is simplified, vectorised and clustered.
    pub motif_length: usize,
    pub min_cluster_size: usize,
    pub allele_column: usize,
    pub peptide_column: usize,
    pub has_header: bool,
}

impl Default for MotifsConfig {
    fn default() -> Self {
        MotifsConfig {
            amino_acids: STANDARD_AMINO_ACIDS.to_string(),
            excluded_allele_marker: DEFAULT_EXCLUDED_ALLELE_MARKER.to_string(),
            motif_length: DEFAULT_MOTIF_LENGTH,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            allele_column: DEFAULT_ALLELE_COLUMN,
            peptide_column: DEFAULT_PEPTIDE_COLUMN,
            has_header: true,
        }
    }
}

impl MotifsConfig {
    pub fn alphabet(&self) -> Result<AminoAcidAlphabet, CoreError> {
        AminoAcidAlphabet::try_from(self.amino_acids.as_str())
    }

    ///
    /// Check the configuration for values the pipeline cannot run with.
    ///
    pub fn validate(&self) -> ConfigResult<()> {
        self.alphabet()?;

        if self.motif_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "motif_length",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.min_cluster_size < 2 {
            return Err(ConfigError::InvalidValue {
                key: "min_cluster_size",
                reason: format!(
                    "must be at least 2 (a single allele is never a cluster), got {}",
                    self.min_cluster_size
                ),
            });
        }

        if self.allele_column == self.peptide_column {
            return Err(ConfigError::InvalidValue {
                key: "peptide_column",
                reason: format!("must differ from allele_column ({})", self.allele_column),
            });
        }

        Ok(())
    }

    /// Number of columns a row needs to carry both fields.
    pub fn required_columns(&self) -> usize {
        self.allele_column.max(self.peptide_column) + 1
    }
}

impl TryFrom<&Path> for MotifsConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: MotifsConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
