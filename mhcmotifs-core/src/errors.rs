use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Amino-acid alphabet is empty")]
    EmptyAlphabet,

    #[error("Invalid amino-acid symbol in alphabet: {0:?}")]
    InvalidAminoAcid(String),

    #[error("Duplicate amino acid in alphabet: {0}")]
    DuplicateAminoAcid(char),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error(transparent)]
    Alphabet(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
