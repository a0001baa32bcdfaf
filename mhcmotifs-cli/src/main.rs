mod cluster;
mod pipeline;
mod run;
mod settings;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "mhcmotifs";
    pub const BIN_NAME: &str = "mhcmotifs";

    pub const OUTPUT_SUBDIR: &str = "motifs";
    pub const LENGTH_DISTRIBUTIONS_FILE: &str = "peptide_length_distributions.json";
    pub const GRADED_DISTRIBUTIONS_FILE: &str = "sorted_amino_acid_distributions.json";
    pub const SIMPLIFIED_MOTIFS_FILE: &str = "simplified_motifs.json";
    pub const CLUSTERS_FILE: &str = "clusters.json";
    pub const MOTIF_TABLE_FILE: &str = "motifs.csv";
    pub const ACTION_LOG_FILE: &str = "action_log.json";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Peptide-binding motifs for MHC class I alleles: distributions, grades, simplified motifs and motif clusters.")
        .subcommand_required(true)
        .subcommand(run::cli::create_run_cli())
        .subcommand(cluster::cli::create_cluster_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // FULL PIPELINE
        //
        Some((run::cli::RUN_CMD, matches)) => {
            run::handlers::run_motifs(matches)?;
        }

        //
        // CLUSTERING ONLY
        //
        Some((cluster::cli::CLUSTER_CMD, matches)) => {
            cluster::handlers::run_cluster(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
