use std::path::Path;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, arg, value_parser};
use log::info;

use mhcmotifs_core::MotifsConfig;

/// Arguments shared by every subcommand that runs the pipeline.
pub fn pipeline_args() -> Vec<Arg> {
    vec![
        arg!(--input <INPUT>)
            .required(true)
            .help("Path to the tab-delimited peptide table (.tsv or .tsv.gz)"),
        arg!(--config <CONFIG>)
            .required(false)
            .help("Path to a TOML run configuration"),
        Arg::new("motif-length")
            .long("motif-length")
            .required(false)
            .value_parser(value_parser!(usize))
            .help("Peptide length to simplify, vectorise and cluster (default: 9)"),
        Arg::new("min-cluster-size")
            .long("min-cluster-size")
            .required(false)
            .value_parser(value_parser!(usize))
            .help("Smallest group of alleles that counts as a cluster (default: 2)"),
        Arg::new("exclude-marker")
            .long("exclude-marker")
            .required(false)
            .help("Drop alleles whose identifier contains this text (default: H2; empty keeps all)"),
    ]
}

///
/// Build the run configuration: the TOML file if one was given, otherwise the
/// defaults, with command-line flags taking precedence.
///
pub fn load_config(matches: &ArgMatches) -> Result<MotifsConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            info!("Loading configuration from {}", path);
            MotifsConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to load configuration: {}", path))?
        }
        None => MotifsConfig::default(),
    };

    if let Some(motif_length) = matches.get_one::<usize>("motif-length") {
        config.motif_length = *motif_length;
    }
    if let Some(min_cluster_size) = matches.get_one::<usize>("min-cluster-size") {
        config.min_cluster_size = *min_cluster_size;
    }
    if let Some(marker) = matches.get_one::<String>("exclude-marker") {
        config.excluded_allele_marker = marker.clone();
    }

    config.validate().context("Invalid configuration")?;

    Ok(config)
}
