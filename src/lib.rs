//! # Command line interface for castools
//! [castools command line interface, subcommands, and options.](cli::Commands)
//! # README for castools
#![doc = include_str!("../README.md")]
/// Parse rows of the CAS table.
pub mod cas;
/// Command line interface for castools.
pub mod cli;
/// Error types.
pub mod errors;
/// Convert mapped reads into interval lines.
pub mod interval;
/// Module for automatically reading a writing compressed or uncompressed files.
pub mod myio;
/// Pair mates and summarize the distances between them.
pub mod pairs;
/// Distance between stranded intervals.
pub mod range;
/// Split a CAS assembly into per reference jobs.
pub mod split;
