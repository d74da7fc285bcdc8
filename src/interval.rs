use super::cas::{parse_lines, records, CasRecord, Span};
use super::errors::Result;
use super::myio;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Simplified interval line for one mapped read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub read_name: String,
    pub ref_index: i64,
    /// 0-based, half open
    pub start: u64,
    pub stop: i64,
    pub score: i64,
    pub strand: char,
}

impl Interval {
    /// `None` for reads that did not map.
    ///
    /// A read with coordinates but a negative reference start is also `None`
    /// (with a warning), since there is no reference position to print.
    /// # Example
    /// ```
    /// use castools::cas::CasRecord;
    /// use castools::interval::Interval;
    /// let rec = CasRecord::new("- readA 100 5 95 3 1000 1080 0 78 1 250").unwrap();
    /// let interval = Interval::from_record(&rec).unwrap();
    /// assert_eq!(interval.to_string(), "readA\t3\t1000\t1080\t250\t+");
    /// ```
    pub fn from_record(rec: &CasRecord) -> Option<Interval> {
        if !rec.read.is_mapped() {
            return None;
        }
        match rec.reference {
            Span::Mapped { start, stop } => Some(Interval {
                read_name: rec.read_name.clone(),
                ref_index: rec.ref_index,
                start: start - 1,
                stop,
                score: rec.score,
                strand: rec.strand_symbol(),
            }),
            Span::Unmapped => {
                log::warn!(
                    "{} has read coordinates but no reference start, skipping",
                    rec.read_name
                );
                None
            }
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.read_name, self.ref_index, self.start, self.stop, self.score, self.strand
        )
    }
}

/// Intervals for every mapped read in a stream of CAS lines.
///
/// Lines are parsed as they are pulled, so memory does not grow with the input.
/// Calling this again on a fresh source of the same lines starts over.
pub fn intervals<I, S>(lines: I) -> impl Iterator<Item = Result<Interval>>
where
    I: IntoIterator<Item = std::io::Result<S>>,
    S: AsRef<str>,
{
    parse_lines(lines).filter_map(|rec| match rec {
        Ok(rec) => Interval::from_record(&rec).map(Ok),
        Err(e) => Some(Err(e)),
    })
}

/// Write the intervals of a CAS table to `out`, returning how many were written.
///
/// The file is read twice: once to check every line, then again to stream the
/// intervals, so a malformed line leaves `out` untouched.
pub fn write_intervals<P: AsRef<Path>, W: Write>(path: P, out: &mut W) -> Result<usize> {
    let path = path.as_ref();
    let n_records = records(myio::reader(path)?).try_fold(0_usize, |n, rec| rec.map(|_| n + 1))?;
    log::debug!("{} CAS records in {}", n_records, path.display());

    let mut n_intervals = 0;
    for interval in intervals(myio::reader(path)?.lines()) {
        writeln!(out, "{}", interval?)?;
        n_intervals += 1;
    }
    out.flush()?;
    Ok(n_intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CasError;
    use std::io;

    fn lines(text: &str) -> Vec<io::Result<String>> {
        text.lines().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn test_skips_unmapped_reads() {
        let text = "- readA 100 5 95 3 1000 1080 0 78 1 250\n\
                    - readB 100 -1 -1 -1 -1 -1 0 0 1 0\n\
                    - readC 100 0 99 7 0 99 1 99 1 300\n";
        let out: Vec<String> = intervals(lines(text))
            .map(|i| i.unwrap().to_string())
            .collect();
        assert_eq!(
            out,
            vec![
                "readA\t3\t1000\t1080\t250\t+".to_string(),
                "readC\t7\t0\t99\t300\t-".to_string(),
            ]
        );
    }

    #[test]
    fn test_start_is_record_start_minus_one() {
        let rec = CasRecord::new("- r 100 0 99 2 41 140 0 99 0 5").unwrap();
        let interval = Interval::from_record(&rec).unwrap();
        assert_eq!(interval.start as i64, rec.reference.raw_start() - 1);
        assert_eq!(interval.start, 41);
    }

    #[test]
    fn test_mapped_read_without_reference_is_skipped() {
        let rec = CasRecord::new("- r 100 0 99 2 -1 -1 0 99 0 5").unwrap();
        assert!(Interval::from_record(&rec).is_none());
        let text = "- readA 100 5 95 3 -1 1080 0 78 1 250\n";
        assert_eq!(intervals(lines(text)).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let input = vec![
            "- readA 100 5 95 3 1000 1080 0 78 1 250".to_string(),
            "- readB 100 -1 -1 -1 -1 -1 0 0 1 0".to_string(),
        ];
        let run = || -> Vec<Interval> {
            intervals(input.iter().map(|l| Ok::<_, io::Error>(l.as_str())))
                .collect::<Result<_>>()
                .unwrap()
        };
        let first = run();
        assert_eq!(first.len(), 1);
        assert_eq!(first, run());
    }

    #[test]
    fn test_write_intervals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cas.tab");
        std::fs::write(
            &path,
            "- readA 100 5 95 3 1000 1080 0 78 1 250\n- readB 100 -1 -1 -1 -1 -1 0 0 1 0\n",
        )
        .unwrap();
        let mut out = Vec::new();
        assert_eq!(write_intervals(&path, &mut out).unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "readA\t3\t1000\t1080\t250\t+\n");
    }

    #[test]
    fn test_malformed_line_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cas.tab");
        std::fs::write(
            &path,
            "- readA 100 5 95 3 1000 1080 0 78 1 250\n- readB 100 5 95 3 1000 1080\n",
        )
        .unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_intervals(&path, &mut out),
            Err(CasError::MalformedRecord { line: 2, .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_is_surfaced() {
        let text = "- readA 100 5 95 3 1000 1080 0 78 1 250\n- short 1 2 3 4 5 6\n";
        let result: Result<Vec<Interval>> = intervals(lines(text)).collect();
        match result {
            Err(CasError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
