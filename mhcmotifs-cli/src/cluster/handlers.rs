use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::ArgMatches;

use mhcmotifs_cluster::ClusterLabel;
use mhcmotifs_core::AlleleSlug;
use mhcmotifs_io::read_records;

use crate::pipeline::MotifPipeline;
use crate::settings::load_config;

/// One line per group: `cluster_1: [hla_a_02_01, hla_a_02_06]`.
pub fn format_groups(groups: &BTreeMap<ClusterLabel, Vec<AlleleSlug>>) -> Vec<String> {
    groups
        .iter()
        .map(|(label, alleles)| {
            let alleles: Vec<&str> = alleles.iter().map(AlleleSlug::as_str).collect();
            format!("{}: [{}]", label, alleles.join(", "))
        })
        .collect()
}

pub fn run_cluster(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("--input is required")?;

    let config = load_config(matches)?;
    let records = read_records(input, &config)
        .with_context(|| format!("Failed to read peptide table: {}", input))?;

    let mut pipeline = MotifPipeline::new(config);
    let results = pipeline.run(&records)?;

    for line in format_groups(&results.assignments.groups()) {
        println!("{}", line);
    }

    Ok(())
}
