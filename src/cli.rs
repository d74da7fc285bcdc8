use crate::pairs::MAX_CUTOFF;
use crate::range::DistMode;
use clap::{AppSettings, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    propagate_version = true,
    subcommand_required = true,
    infer_subcommands = true,
    arg_required_else_help = true,
    help_expected = true
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
pub struct Cli {
    /// Logging level [-v: Info, -vv: Debug, -vvv: Trace].
    #[clap(short, long, parse(from_occurrences), global = true, help_heading = "DEBUG")]
    pub verbose: usize,

    #[clap(subcommand)]
    pub command: Commands,
}

///
/// This structure contains all the subcommands for castools and their help descriptions.
///
/// The input of `bed` and `pairs` is the table written by `assembly_table -n -s -p`
/// from the CLC assembly cell, optionally gzipped.
///
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a CAS assembly into one sub assembly per reference using `sub_assembly`.
    ///
    /// The two numbers are the first and last reference index (inclusive).
    /// Every index gets its own background job writing `sa.<i>.cas` and friends into the current directory.
    /// Jobs are not waited on.
    Split {
        /// Binary CAS assembly file.
        casfile: String,
        /// First reference index.
        start: u64,
        /// Last reference index.
        end: u64,
        /// Submit the jobs with `qsub` instead of running them locally.
        #[clap(short, long)]
        grid: bool,
    },
    /// Convert a CAS table into intervals of the mapped reads.
    ///
    /// ## output columns:
    ///  `read_name, reference_index, start (0-based), end, score, strand`
    Bed {
        /// CAS table.
        castab: String,
    },
    /// Summarize the paired-end reads of a CAS table.
    ///
    /// Reports how many pairs were found, how many are linked within the cutoff,
    /// how many have mates on different contigs, and the distance between linked mates.
    Pairs {
        /// CAS table.
        castab: String,
        /// Largest distance between mates that still counts as a link, negative values mean no cutoff.
        #[clap(short, long, default_value_t = MAX_CUTOFF, allow_hyphen_values = true)]
        cutoff: i64,
        /// Write the linked pairs to <basename>.pairs.
        #[clap(short, long)]
        pairs: bool,
        /// Write the linked distances to <basename>.inserts.
        #[clap(short, long, parse(try_from_str), default_value_t = true)]
        inserts: bool,
        /// Distance between mates: outer span (ss) or gap between inner ends (ee).
        #[clap(short, long, arg_enum, default_value_t = DistMode::Ss)]
        dist_mode: DistMode,
    },
}

pub fn make_cli_parse() -> Cli {
    Cli::parse()
}
