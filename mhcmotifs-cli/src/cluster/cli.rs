use clap::Command;

use crate::settings::pipeline_args;

pub const CLUSTER_CMD: &str = "cluster";

pub fn create_cluster_cli() -> Command {
    Command::new(CLUSTER_CMD)
        .about("Cluster alleles by motif similarity and print the groups.")
        .args(pipeline_args())
}
