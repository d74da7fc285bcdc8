use anyhow::{Context, Result};
use castools::cli::Commands;
use castools::*;
use colored::Colorize;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io;
use std::time::Instant;

fn main() -> Result<()> {
    parse_cli()
}

pub fn parse_cli() -> Result<()> {
    let pg_start = Instant::now();
    let args = cli::make_cli_parse();
    let subcommand = match &args.command {
        Commands::Split { .. } => "split",
        Commands::Bed { .. } => "bed",
        Commands::Pairs { .. } => "pairs",
    };

    // set the logging level
    let min_log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .target(Target::Stderr)
        .filter(None, min_log_level)
        .init();

    log::debug!("DEBUG logging enabled");
    log::trace!("TRACE logging enabled");

    match &args.command {
        //
        // Run Split
        //
        Commands::Split {
            casfile,
            start,
            end,
            grid,
        } => {
            let launched = if *grid {
                split::split_assembly(casfile, *start, *end, &mut split::GridLauncher::default())?
                    .len()
            } else {
                split::split_assembly(casfile, *start, *end, &mut split::LocalLauncher)?.len()
            };
            log::info!("Launched {} sub_assembly jobs.", launched);
        }
        //
        // Run Bed
        //
        Commands::Bed { castab } => {
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            let n_intervals = interval::write_intervals(castab, &mut out)
                .with_context(|| format!("Failed to convert {}", castab))?;
            log::info!("{} intervals written from {}", n_intervals, castab);
        }
        //
        // Run Pairs
        //
        Commands::Pairs {
            castab,
            cutoff,
            pairs: write_pairs,
            inserts: write_inserts,
            dist_mode,
        } => {
            let opts = pairs::PairOptions {
                cutoff: pairs::Cutoff::new(*cutoff),
                dist_mode: *dist_mode,
            };
            let outputs = pairs::PairOutputs {
                pairs: *write_pairs,
                inserts: *write_inserts,
            };
            let report = pairs::report_file(castab, opts, outputs)
                .with_context(|| format!("Failed to summarize pairs in {}", castab))?;
            print!("{}", report);
        }
    };

    let duration = pg_start.elapsed();
    log::info!(
        "{} done! Time elapsed: {}",
        subcommand.bright_green().bold(),
        format!("{:.2?}", duration).bright_yellow().bold()
    );
    Ok(())
}
