use clap::{Command, arg};

use crate::settings::pipeline_args;

pub const RUN_CMD: &str = "run";

pub fn create_run_cli() -> Command {
    Command::new(RUN_CMD)
        .about("Build, grade, simplify and cluster peptide-binding motifs, writing every result to disk.")
        .args(pipeline_args())
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .default_value(".")
                .help("Directory to write results into (a motifs/ folder is created inside)"),
        )
}
