use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use mhcmotifs_io::{read_records, write_json, write_motif_table};

use crate::consts::*;
use crate::pipeline::{ClusterReport, MotifPipeline, StepRecord, spinner};
use crate::settings::load_config;

pub fn run_motifs(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    let output = matches
        .get_one::<String>("output")
        .context("--output is required")?;

    let config = load_config(matches)?;
    let records = read_records(input, &config)
        .with_context(|| format!("Failed to read peptide table: {}", input))?;

    let mut pipeline = MotifPipeline::new(config);
    let results = pipeline.run(&records)?;
    info!(
        "{} motif vectors over {} features",
        results.matrix.len(),
        results.matrix.dimension()
    );

    let out_dir = Path::new(output).join(OUTPUT_SUBDIR);
    let pb = spinner(format!("Writing results to {}", out_dir.display()));

    write_json(
        &results.length_distributions,
        out_dir.join(LENGTH_DISTRIBUTIONS_FILE),
        false,
    )?;
    write_json(&results.graded, out_dir.join(GRADED_DISTRIBUTIONS_FILE), false)?;
    write_json(&results.simplified, out_dir.join(SIMPLIFIED_MOTIFS_FILE), true)?;
    write_json(
        &ClusterReport::from(&results.assignments),
        out_dir.join(CLUSTERS_FILE),
        true,
    )?;
    let rows = write_motif_table(
        &results.graded,
        pipeline.config().motif_length,
        out_dir.join(MOTIF_TABLE_FILE),
    )?;

    pipeline.record_step(StepRecord::new("write").with_rows_written(rows));
    write_json(pipeline.action_log(), out_dir.join(ACTION_LOG_FILE), true)?;

    pb.finish_with_message(format!("Results written to {}", out_dir.display()));

    Ok(())
}
