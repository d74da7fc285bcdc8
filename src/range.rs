use super::cas::{strand_symbol, CasRecord, Span};
use bio_types::strand::ReqStrand;
use clap::ArgEnum;
use std::fmt;

/// How the distance between two mates is measured.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistMode {
    /// Outer span: first start to last stop.
    Ss,
    /// Gap between the inner ends.
    Ee,
}

impl Default for DistMode {
    fn default() -> Self {
        DistMode::Ss
    }
}

impl fmt::Display for DistMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DistMode::Ss => write!(f, "ss"),
            DistMode::Ee => write!(f, "ee"),
        }
    }
}

/// A stranded interval on a reference sequence, coordinates 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub ref_index: i64,
    pub start: i64,
    pub stop: i64,
    pub strand: ReqStrand,
}

impl Range {
    /// `None` when the record has no reference coordinates.
    pub fn from_record(rec: &CasRecord) -> Option<Range> {
        match rec.reference {
            Span::Mapped { start, stop } => Some(Range {
                ref_index: rec.ref_index,
                start: i64::try_from(start).unwrap_or(i64::MAX),
                stop,
                strand: rec.strand,
            }),
            Span::Unmapped => None,
        }
    }
}

/// Result of comparing the positions of two mates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeDistance {
    /// Same reference; orientation is the strands ordered by start, e.g. `+-`.
    Linked { distance: i64, orientation: String },
    /// The mates landed on different contigs.
    InterContig,
}

/// Distance between two ranges.
///
/// Coordinates are not range checked by the parser, so the arithmetic is done
/// in `i128` and the result saturates at the `i64` bounds.
/// # Example
/// ```
/// use castools::range::*;
/// use bio_types::strand::ReqStrand::*;
/// let a = Range { ref_index: 1, start: 101, stop: 200, strand: Forward };
/// let b = Range { ref_index: 1, start: 401, stop: 500, strand: Reverse };
/// assert_eq!(
///     range_distance(&b, &a, DistMode::Ss),
///     RangeDistance::Linked { distance: 400, orientation: "+-".to_string() }
/// );
/// assert_eq!(
///     range_distance(&a, &b, DistMode::Ee),
///     RangeDistance::Linked { distance: 200, orientation: "+-".to_string() }
/// );
/// let c = Range { ref_index: 2, ..a };
/// assert_eq!(range_distance(&a, &c, DistMode::Ss), RangeDistance::InterContig);
/// ```
pub fn range_distance(a: &Range, b: &Range, mode: DistMode) -> RangeDistance {
    if a.ref_index != b.ref_index {
        return RangeDistance::InterContig;
    }
    let (a, b) = if a.start > b.start { (b, a) } else { (a, b) };
    let distance = match mode {
        DistMode::Ss => b.stop as i128 - a.start as i128 + 1,
        DistMode::Ee => b.start as i128 - a.stop as i128 - 1,
    };
    let distance = distance.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
    let orientation = [strand_symbol(a.strand), strand_symbol(b.strand)]
        .iter()
        .collect();
    RangeDistance::Linked {
        distance,
        orientation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cas::make_fake_cas_rec;

    #[test]
    fn test_outie() {
        let a = Range::from_record(&make_fake_cas_rec("r", 4, 1000, 1100, true)).unwrap();
        let b = Range::from_record(&make_fake_cas_rec("r", 4, 3000, 3100, false)).unwrap();
        match range_distance(&a, &b, DistMode::Ss) {
            RangeDistance::Linked {
                distance,
                orientation,
            } => {
                assert_eq!(distance, 3100 - 1001 + 1);
                assert_eq!(orientation, "-+");
            }
            RangeDistance::InterContig => panic!("same contig"),
        }
    }

    #[test]
    fn test_overlapping_mates_in_ee_mode() {
        let a = Range::from_record(&make_fake_cas_rec("r", 1, 0, 100, false)).unwrap();
        let b = Range::from_record(&make_fake_cas_rec("r", 1, 50, 150, true)).unwrap();
        assert_eq!(
            range_distance(&a, &b, DistMode::Ee),
            RangeDistance::Linked {
                distance: 51 - 100 - 1,
                orientation: "+-".to_string()
            }
        );
    }

    #[test]
    fn test_extreme_stops_saturate() {
        let low = Range::from_record(&make_fake_cas_rec("r", 1, 0, i64::MIN, false)).unwrap();
        let mate = Range::from_record(&make_fake_cas_rec("r", 1, 5, 100, true)).unwrap();
        let far = Range::from_record(&make_fake_cas_rec("r", 1, 19, i64::MIN, false)).unwrap();
        let high = Range::from_record(&make_fake_cas_rec("r", 1, 10, i64::MAX, true)).unwrap();
        let distance = |a: &Range, b: &Range, mode| match range_distance(a, b, mode) {
            RangeDistance::Linked { distance, .. } => distance,
            RangeDistance::InterContig => panic!("same contig"),
        };
        // 6 - i64::MIN - 1 is past i64::MAX
        assert_eq!(distance(&low, &mate, DistMode::Ee), i64::MAX);
        // i64::MIN - 6 + 1 is past i64::MIN
        assert_eq!(distance(&mate, &far, DistMode::Ss), i64::MIN);
        assert_eq!(distance(&low, &high, DistMode::Ss), i64::MAX);
    }

    #[test]
    fn test_unmapped_reference_has_no_range() {
        let rec = CasRecord::new("- r 100 -1 -1 0 -1 -1 0 0 1 0").unwrap();
        assert!(Range::from_record(&rec).is_none());
    }
}
