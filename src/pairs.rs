use super::cas::CasRecord;
use super::errors::Result;
use super::myio;
use super::range::{range_distance, DistMode, Range, RangeDistance};
use itertools::Itertools;
use lazy_static::lazy_static;
use num_format::{Locale, ToFormattedString};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

lazy_static! {
    static ref MATE_RE: Regex = Regex::new(r"^(.+)/[12]$").unwrap();
}

/// Cutoff used when none is given, large enough to accept every pair.
pub const MAX_CUTOFF: i64 = 1_000_000_000;

/// Largest mate distance that still counts as a linked pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(i64);

impl Cutoff {
    /// Negative values mean "no cutoff".
    /// # Example
    /// ```
    /// use castools::pairs::{Cutoff, MAX_CUTOFF};
    /// assert_eq!(Cutoff::new(500).value(), 500);
    /// assert_eq!(Cutoff::new(-1).value(), MAX_CUTOFF);
    /// ```
    pub fn new(cutoff: i64) -> Cutoff {
        if cutoff < 0 {
            Cutoff(MAX_CUTOFF)
        } else {
            Cutoff(cutoff)
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Cutoff(MAX_CUTOFF)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PairOptions {
    pub cutoff: Cutoff,
    pub dist_mode: DistMode,
}

/// Name shared by both mates: a trailing `/1` or `/2` is dropped.
/// # Example
/// ```
/// use castools::pairs::mate_key;
/// assert_eq!(mate_key("frag7/1"), "frag7");
/// assert_eq!(mate_key("frag7/2"), "frag7");
/// assert_eq!(mate_key("frag7"), "frag7");
/// assert_eq!(mate_key("frag7/3"), "frag7/3");
/// ```
pub fn mate_key(read_name: &str) -> &str {
    match MATE_RE.captures(read_name).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str(),
        None => read_name,
    }
}

/// What happened to one pair of mates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairClass {
    Linked { distance: i64, orientation: String },
    Long { distance: i64 },
    InterContig,
    /// At least one mate has no reference coordinates.
    Unmapped,
}

pub fn classify(a: &CasRecord, b: &CasRecord, opts: &PairOptions) -> PairClass {
    let (ra, rb) = match (Range::from_record(a), Range::from_record(b)) {
        (Some(ra), Some(rb)) => (ra, rb),
        _ => return PairClass::Unmapped,
    };
    match range_distance(&ra, &rb, opts.dist_mode) {
        RangeDistance::InterContig => PairClass::InterContig,
        RangeDistance::Linked {
            distance,
            orientation,
        } => {
            if distance <= opts.cutoff.value() {
                PairClass::Linked {
                    distance,
                    orientation,
                }
            } else {
                PairClass::Long { distance }
            }
        }
    }
}

/// A pair of mates on the same contig within the cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedPair {
    pub read_a: String,
    pub read_b: String,
    pub ref_index: i64,
    pub distance: i64,
    pub orientation: String,
}

impl fmt::Display for LinkedPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.read_a, self.read_b, self.ref_index, self.distance, self.orientation
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceStats {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
}

impl DistanceStats {
    /// `None` for an empty slice.
    /// # Example
    /// ```
    /// use castools::pairs::DistanceStats;
    /// let stats = DistanceStats::new(&[400, 100, 300, 200]).unwrap();
    /// assert_eq!(stats.min, 100);
    /// assert_eq!(stats.max, 400);
    /// assert_eq!(stats.mean, 250.0);
    /// assert_eq!(stats.median, 250.0);
    /// assert!(DistanceStats::new(&[]).is_none());
    /// ```
    pub fn new(distances: &[i64]) -> Option<DistanceStats> {
        if distances.is_empty() {
            return None;
        }
        let mut sorted = distances.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        let mean = sorted.iter().map(|&d| d as f64).sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as i128 + sorted[n / 2] as i128) as f64 / 2.0
        };
        let variance = sorted
            .iter()
            .map(|&d| (d as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        Some(DistanceStats {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            stdev: variance.sqrt(),
        })
    }
}

/// Counts of every pairing outcome in a CAS table.
#[derive(Debug, Default)]
pub struct PairReport {
    pub opts: PairOptions,
    /// Reads whose name group is not exactly two records.
    pub fragments: usize,
    pub pairs: usize,
    pub long: usize,
    pub inter_contig: usize,
    pub unmapped: usize,
    pub orientations: BTreeMap<String, usize>,
    pub linked_pairs: Vec<LinkedPair>,
}

impl PairReport {
    /// Sort the records by mate name, pair them up and classify every pair.
    pub fn new(mut records: Vec<CasRecord>, opts: PairOptions) -> PairReport {
        records.sort_by(|a, b| {
            mate_key(&a.read_name)
                .cmp(mate_key(&b.read_name))
                .then_with(|| a.read_name.cmp(&b.read_name))
        });

        let mut report = PairReport {
            opts,
            ..Default::default()
        };
        for (key, group) in &records
            .iter()
            .group_by(|rec| mate_key(&rec.read_name).to_string())
        {
            let group: Vec<&CasRecord> = group.collect();
            if group.len() != 2 {
                log::debug!("{} has {} records, not a pair", key, group.len());
                report.fragments += group.len();
                continue;
            }
            report.add_pair(group[0], group[1]);
        }
        report
    }

    fn add_pair(&mut self, a: &CasRecord, b: &CasRecord) {
        self.pairs += 1;
        match classify(a, b, &self.opts) {
            PairClass::Linked {
                distance,
                orientation,
            } => {
                *self.orientations.entry(orientation.clone()).or_insert(0) += 1;
                self.linked_pairs.push(LinkedPair {
                    read_a: a.read_name.clone(),
                    read_b: b.read_name.clone(),
                    ref_index: a.ref_index,
                    distance,
                    orientation,
                });
            }
            PairClass::Long { distance } => {
                log::trace!("{} and {} are {} apart", a.read_name, b.read_name, distance);
                self.long += 1;
            }
            PairClass::InterContig => self.inter_contig += 1,
            PairClass::Unmapped => self.unmapped += 1,
        }
    }

    pub fn linked(&self) -> usize {
        self.linked_pairs.len()
    }

    pub fn distances(&self) -> Vec<i64> {
        self.linked_pairs.iter().map(|p| p.distance).collect()
    }

    pub fn distance_stats(&self) -> Option<DistanceStats> {
        DistanceStats::new(&self.distances())
    }

    /// One linked pair per line.
    pub fn write_pairs<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for pair in &self.linked_pairs {
            writeln!(out, "{}", pair)?;
        }
        out.flush()
    }

    /// One linked distance per line, for plotting the insert size distribution.
    pub fn write_inserts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for pair in &self.linked_pairs {
            writeln!(out, "{}", pair.distance)?;
        }
        out.flush()
    }
}

/// Output files written next to the CAS table by [`report_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PairOutputs {
    /// `<basename>.pairs`
    pub pairs: bool,
    /// `<basename>.inserts`
    pub inserts: bool,
}

/// Build the pair report of a CAS table and write the requested output files.
///
/// The whole table is parsed before any file is created, so a malformed line
/// leaves the directory untouched.
pub fn report_file<P: AsRef<Path>>(
    path: P,
    opts: PairOptions,
    outputs: PairOutputs,
) -> Result<PairReport> {
    let path = path.as_ref();
    let records = CasRecord::from_file(path)?;
    log::info!("{} CAS records in {}", records.len(), path.display());
    let report = PairReport::new(records, opts);

    if outputs.pairs {
        let out = myio::sibling(path, "pairs");
        report.write_pairs(&mut myio::writer(&out)?)?;
        log::info!("Linked pairs written to {}", out.display());
    }
    if outputs.inserts {
        let out = myio::sibling(path, "inserts");
        report.write_inserts(&mut myio::writer(&out)?)?;
        log::info!("Insert sizes written to {}", out.display());
    }
    Ok(report)
}

fn percent(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * n as f64 / total as f64
    }
}

fn count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs = self.pairs;
        writeln!(f, "Fragments (reads without a mate): {}", count(self.fragments))?;
        writeln!(f, "Pairs: {}", count(pairs))?;
        writeln!(
            f,
            "  linked (distance <= {}): {} ({:.1}%)",
            self.opts.cutoff.value().to_formatted_string(&Locale::en),
            count(self.linked()),
            percent(self.linked(), pairs)
        )?;
        writeln!(
            f,
            "  longer than cutoff: {} ({:.1}%)",
            count(self.long),
            percent(self.long, pairs)
        )?;
        writeln!(
            f,
            "  mates on different contigs: {} ({:.1}%)",
            count(self.inter_contig),
            percent(self.inter_contig, pairs)
        )?;
        writeln!(
            f,
            "  mate unmapped: {} ({:.1}%)",
            count(self.unmapped),
            percent(self.unmapped, pairs)
        )?;
        match self.distance_stats() {
            Some(stats) => {
                writeln!(
                    f,
                    "Distance between linked mates ({}): min {}, median {:.1}, mean {:.1} +/- {:.1}, max {}",
                    self.opts.dist_mode, stats.min, stats.median, stats.mean, stats.stdev, stats.max
                )?;
                writeln!(f, "Orientations of linked mates:")?;
                for (orientation, n) in &self.orientations {
                    writeln!(
                        f,
                        "  {}: {} ({:.1}%)",
                        orientation,
                        count(*n),
                        percent(*n, self.linked())
                    )?;
                }
            }
            None => writeln!(f, "No linked mates.")?,
        }
        Ok(())
    }
}
