use super::errors::{CasError, Result};
use super::myio;
use bio_types::strand::ReqStrand;
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

/// Number of columns in a `assembly_table -n -s -p` row:
/// read index, read name and ten fixed trailing fields.
pub const CAS_COLUMNS: usize = 12;

/// Coordinates of one side of an alignment.
///
/// The CAS table marks unaligned reads with a start of `-1`.
/// That sentinel never makes it past the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// `start` is 1-based, `stop` is passed through as written.
    Mapped { start: u64, stop: i64 },
    Unmapped,
}

impl Span {
    /// Build a span from the raw 0-based start and stop columns.
    /// # Example
    /// ```
    /// use castools::cas::Span;
    /// assert_eq!(Span::from_raw(0, 50), Span::Mapped { start: 1, stop: 50 });
    /// assert_eq!(Span::from_raw(-1, -1), Span::Unmapped);
    /// ```
    pub fn from_raw(start: i64, stop: i64) -> Span {
        if start >= 0 {
            Span::Mapped {
                start: start as u64 + 1,
                stop,
            }
        } else {
            Span::Unmapped
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Span::Mapped { .. })
    }

    /// The tabular view of the start: 1-based when mapped, `-1` otherwise.
    pub fn raw_start(&self) -> i64 {
        match self {
            Span::Mapped { start, .. } => i64::try_from(*start).unwrap_or(i64::MAX),
            Span::Unmapped => -1,
        }
    }
}

/// First column of the table, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadIndex {
    Index(u64),
    /// `-` or any other non numeric marker.
    Marker(String),
}

impl ReadIndex {
    /// # Example
    /// ```
    /// use castools::cas::ReadIndex;
    /// assert_eq!(ReadIndex::new("42"), ReadIndex::Index(42));
    /// assert_eq!(ReadIndex::new("-").index(), None);
    /// assert_eq!(ReadIndex::new("NA").to_string(), "NA");
    /// ```
    pub fn new(token: &str) -> ReadIndex {
        match token.parse::<u64>() {
            Ok(idx) => ReadIndex::Index(idx),
            Err(_) => ReadIndex::Marker(token.to_string()),
        }
    }

    pub fn index(&self) -> Option<u64> {
        match self {
            ReadIndex::Index(idx) => Some(*idx),
            ReadIndex::Marker(_) => None,
        }
    }
}

impl fmt::Display for ReadIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadIndex::Index(idx) => write!(f, "{}", idx),
            ReadIndex::Marker(marker) => write!(f, "{}", marker),
        }
    }
}

/// One row of the CAS table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasRecord {
    pub read_index: ReadIndex,
    pub read_name: String,
    pub read_len: u64,
    pub read: Span,
    pub ref_index: i64,
    pub reference: Span,
    pub strand: ReqStrand,
    pub num_matches: i64,
    pub is_paired: bool,
    pub score: i64,
}

fn parse_column<T: FromStr>(token: &str, column: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| CasError::malformed(format!("could not parse {} from {:?}", column, token)))
}

fn parse_flag(token: &str, column: &str) -> Result<bool> {
    Ok(parse_column::<i64>(token, column)? == 1)
}

impl CasRecord {
    /// Parse one line of `assembly_table -n -s -p` output.
    /// # Example
    /// ```
    /// use castools::cas::{CasRecord, Span};
    /// let rec = CasRecord::new("- readA 100 5 95 3 1000 1080 0 78 1 250").unwrap();
    /// assert_eq!(rec.read_index.index(), None);
    /// assert_eq!(rec.read, Span::Mapped { start: 6, stop: 95 });
    /// assert_eq!(rec.reference, Span::Mapped { start: 1001, stop: 1080 });
    /// assert!(CasRecord::new("- readA 100 5 95 3 1000 1080").is_err());
    /// ```
    pub fn new(line: &str) -> Result<CasRecord> {
        let t: Vec<&str> = line.split_ascii_whitespace().collect();
        if t.len() < CAS_COLUMNS {
            return Err(CasError::malformed(format!(
                "expected at least {} columns, found {}",
                CAS_COLUMNS,
                t.len()
            )));
        }
        // the trailing ten columns have a fixed layout
        let tail = &t[t.len() - 10..];
        let rec = CasRecord {
            read_index: ReadIndex::new(t[0]),
            read_name: t[1].to_string(),
            read_len: parse_column(tail[0], "read length")?,
            read: Span::from_raw(
                parse_column(tail[1], "read start")?,
                parse_column(tail[2], "read stop")?,
            ),
            ref_index: parse_column(tail[3], "reference index")?,
            reference: Span::from_raw(
                parse_column(tail[4], "reference start")?,
                parse_column(tail[5], "reference stop")?,
            ),
            strand: if parse_flag(tail[6], "reversed flag")? {
                ReqStrand::Reverse
            } else {
                ReqStrand::Forward
            },
            num_matches: parse_column(tail[7], "match count")?,
            is_paired: parse_flag(tail[8], "paired flag")?,
            score: parse_column(tail[9], "score")?,
        };
        Ok(rec)
    }

    pub fn is_reversed(&self) -> bool {
        self.strand == ReqStrand::Reverse
    }

    /// `+` or `-`
    pub fn strand_symbol(&self) -> char {
        strand_symbol(self.strand)
    }

    /// Read every record of a CAS table, `.gz` files are decompressed.
    /// The first malformed line aborts the read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<CasRecord>> {
        records(myio::reader(path)?).collect()
    }
}

impl FromStr for CasRecord {
    type Err = CasError;

    fn from_str(line: &str) -> Result<CasRecord> {
        CasRecord::new(line)
    }
}

pub fn strand_symbol(strand: ReqStrand) -> char {
    match strand {
        ReqStrand::Forward => '+',
        ReqStrand::Reverse => '-',
    }
}

/// Lazily parse the lines of a CAS table.
/// Errors carry the 1-based line number, a blank line is malformed like any other short line.
pub fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<CasRecord>> {
    parse_lines(reader.lines())
}

/// Same as [`records`] over any source of lines.
pub fn parse_lines<I, S>(lines: I) -> impl Iterator<Item = Result<CasRecord>>
where
    I: IntoIterator<Item = std::io::Result<S>>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| match line {
            Err(e) => Err(CasError::from(e)),
            Ok(line) => CasRecord::new(line.as_ref()).map_err(|e| e.at_line(idx + 1)),
        })
}

#[cfg(test)]
pub(crate) fn make_fake_cas_rec(name: &str, ref_index: i64, start: i64, stop: i64, rev: bool) -> CasRecord {
    CasRecord::new(&format!(
        "1 {} 100 0 99 {} {} {} {} 99 1 200",
        name,
        ref_index,
        start,
        stop,
        if rev { 1 } else { 0 }
    ))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_fields() {
        let rec = CasRecord::new("- readA 100 5 95 3 1000 1080 0 78 1 250").unwrap();
        assert_eq!(rec.read_name, "readA");
        assert_eq!(rec.read_len, 100);
        assert_eq!(rec.read, Span::Mapped { start: 6, stop: 95 });
        assert_eq!(rec.ref_index, 3);
        assert_eq!(rec.reference, Span::Mapped { start: 1001, stop: 1080 });
        assert!(!rec.is_reversed());
        assert_eq!(rec.strand_symbol(), '+');
        assert_eq!(rec.num_matches, 78);
        assert!(rec.is_paired);
        assert_eq!(rec.score, 250);
    }

    #[test]
    fn test_unmapped_sentinel_is_preserved() {
        let rec = CasRecord::new("17 readB 100 -1 -1 -1 -1 -1 0 0 0 0").unwrap();
        assert_eq!(rec.read_index, ReadIndex::Index(17));
        assert_eq!(rec.read, Span::Unmapped);
        assert_eq!(rec.read.raw_start(), -1);
        assert_eq!(rec.reference, Span::Unmapped);
        assert!(!rec.is_paired);
    }

    #[test]
    fn test_zero_start_becomes_one() {
        let rec = CasRecord::new("- r 100 0 99 0 0 99 1 99 0 10").unwrap();
        assert_eq!(rec.read.raw_start(), 1);
        assert_eq!(rec.reference.raw_start(), 1);
        assert!(rec.is_reversed());
        assert_eq!(rec.strand_symbol(), '-');
    }

    #[test]
    fn test_no_range_validation() {
        // stop before start passes through untouched
        let rec = CasRecord::new("- r 100 50 10 2 500 100 0 5 0 1").unwrap();
        assert_eq!(rec.read, Span::Mapped { start: 51, stop: 10 });
        assert_eq!(rec.reference, Span::Mapped { start: 501, stop: 100 });
    }

    #[test]
    fn test_fixed_suffix_with_extra_leading_columns() {
        let rec = CasRecord::new("- readC extra stuff 100 5 95 3 1000 1080 1 78 1 250").unwrap();
        assert_eq!(rec.read_name, "readC");
        assert_eq!(rec.read_len, 100);
        assert!(rec.is_reversed());
    }

    #[test]
    fn test_too_few_columns() {
        let err = CasRecord::new("- readA 100 5 95 3 1000 1080").unwrap_err();
        assert!(matches!(err, CasError::MalformedRecord { .. }));
        assert!(err.to_string().contains("found 8"));
    }

    #[test]
    fn test_bad_integer() {
        let err = "- readA 100 five 95 3 1000 1080 0 78 1 250"
            .parse::<CasRecord>()
            .unwrap_err();
        assert!(err.to_string().contains("read start"));
    }

    #[test]
    fn test_read_index_passes_through() {
        let rec = CasRecord::new("NA readA 100 5 95 3 1000 1080 0 78 1 250").unwrap();
        assert_eq!(rec.read_index, ReadIndex::Marker("NA".to_string()));
        assert_eq!(rec.read_index.index(), None);
        let rec = CasRecord::new("- readA 100 5 95 3 1000 1080 0 78 1 250").unwrap();
        assert_eq!(rec.read_index.to_string(), "-");
    }

    #[test]
    fn test_blank_line_is_malformed() {
        let text = "- a 100 5 95 3 1000 1080 0 78 1 250\n\n- b 100 5 95 3 1000 1080 0 78 1 250\n";
        let parsed: Vec<_> = records(text.as_bytes()).collect();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_ok());
        match &parsed[1] {
            Err(CasError::MalformedRecord { line, reason }) => {
                assert_eq!(*line, 2);
                assert!(reason.contains("found 0"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parsed[2].is_ok());
    }

    #[test]
    fn test_records_report_line_numbers() {
        let text = "- a 100 5 95 3 1000 1080 0 78 1 250\n- b 100 5 95\n";
        let parsed: Vec<_> = records(text.as_bytes()).collect();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is_ok());
        match &parsed[1] {
            Err(CasError::MalformedRecord { line, .. }) => assert_eq!(*line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_extreme_start_saturates() {
        let rec = CasRecord::new(&format!("- r 100 0 99 1 {} 0 0 99 1 1", i64::MAX)).unwrap();
        assert_eq!(rec.reference.raw_start(), i64::MAX);
    }
}
