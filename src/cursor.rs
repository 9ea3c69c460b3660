//! Conversion between display-line positions across record boundaries.

/// A position in the virtual sequence of display lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Line `line` of record `record`. `line` is always less than the number of display
    /// lines the record wraps into.
    Data { record: usize, line: usize },
    /// Before the first display line.
    Start,
    /// At or past the last display line.
    Eof,
}

impl Location {
    pub const fn new(record: usize, line: usize) -> Self {
        Location::Data { record, line }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Location::Data { .. })
    }
}

/// Anything which can report how many display lines a record occupies.
pub trait LineSource {
    /// The number of display lines record `record` wraps into, or `None` if the record does
    /// not exist. This may read more of the underlying file.
    fn line_count(&mut self, record: usize) -> Option<usize>;

    /// The number of records, if the end of the file has been found.
    fn total_records(&mut self) -> Option<usize>;
}

/// Moves `loc` by `delta` display lines, crossing into neighbouring records as needed.
///
/// Every display line is one step, so moving by one from the last line of a record lands on
/// the first line of the next, and moving back by one from a record's first line lands on the
/// last line of the previous record. Moving before the first line of record 0 gives `Start`,
/// and moving past the last line of the last record gives `Eof`.
///
/// The sentinels behave as if they were the line just before the first line (`Start`) and
/// just after the last line (`Eof`). A move of zero always returns `loc` unchanged.
pub fn move_by<S: LineSource + ?Sized>(source: &mut S, loc: Location, delta: i64) -> Location {
    if delta == 0 {
        return loc;
    }

    let (mut record, mut line, mut remaining) = match loc {
        Location::Data { record, line } => (record, line, delta),
        Location::Start if delta < 0 => return Location::Start,
        Location::Start => (0, 0, delta - 1),
        Location::Eof if delta > 0 => return Location::Eof,
        Location::Eof => {
            let last = match source.total_records() {
                None => return Location::Eof,
                Some(0) => return Location::Start,
                Some(n) => n - 1,
            };
            let Some(count) = source.line_count(last) else {
                return Location::Eof;
            };
            (last, count.saturating_sub(1), delta + 1)
        }
    };

    loop {
        let Some(count) = source.line_count(record) else {
            return Location::Eof;
        };
        if line >= count {
            // the width changed since this location was produced
            line = count.saturating_sub(1);
        }
        if remaining == 0 {
            return Location::new(record, line);
        }

        // saturating, so a huge delta runs into Start/Eof rather than wrapping around
        let new_line = (line as i64).saturating_add(remaining);
        if new_line < 0 {
            if record == 0 {
                return Location::Start;
            }
            let Some(prev_count) = source.line_count(record - 1) else {
                return Location::Start;
            };
            record -= 1;
            line = prev_count.saturating_sub(1);
            remaining = new_line + 1;
        } else if new_line >= count as i64 {
            if source.line_count(record + 1).is_none() {
                return Location::Eof;
            }
            record += 1;
            line = 0;
            remaining = new_line - count as i64;
        } else {
            return Location::new(record, new_line as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A file whose record `i` wraps into `counts[i]` lines, and whose end has been found.
    struct Fixed {
        counts: Vec<usize>,
        queried: usize,
    }

    impl Fixed {
        fn new(counts: &[usize]) -> Self {
            Self {
                counts: counts.to_vec(),
                queried: 0,
            }
        }
    }

    impl LineSource for Fixed {
        fn line_count(&mut self, record: usize) -> Option<usize> {
            self.queried += 1;
            self.counts.get(record).copied()
        }

        fn total_records(&mut self) -> Option<usize> {
            Some(self.counts.len())
        }
    }

    #[test]
    fn two_record_scenario() {
        let mut src = Fixed::new(&[3, 2]);
        assert_eq!(move_by(&mut src, Location::new(0, 0), 4), Location::new(1, 1));
        assert_eq!(move_by(&mut src, Location::new(1, 1), 100), Location::Eof);
        assert_eq!(move_by(&mut src, Location::new(0, 0), -1), Location::Start);
    }

    #[test]
    fn single_steps_cross_boundaries() {
        let mut src = Fixed::new(&[3, 2, 4]);
        assert_eq!(move_by(&mut src, Location::new(0, 2), 1), Location::new(1, 0));
        assert_eq!(move_by(&mut src, Location::new(1, 0), -1), Location::new(0, 2));
        assert_eq!(move_by(&mut src, Location::new(1, 1), 1), Location::new(2, 0));
        assert_eq!(move_by(&mut src, Location::new(2, 3), 1), Location::Eof);
        assert_eq!(move_by(&mut src, Location::new(2, 0), -3), Location::new(0, 2));
    }

    #[test]
    fn zero_is_identity_without_lookups() {
        let mut src = Fixed::new(&[1]);
        for loc in [Location::Start, Location::Eof, Location::new(0, 0), Location::new(9, 9)] {
            assert_eq!(move_by(&mut src, loc, 0), loc);
        }
        assert_eq!(src.queried, 0);
    }

    #[test]
    fn missing_record_is_eof() {
        let mut src = Fixed::new(&[2, 2]);
        assert_eq!(move_by(&mut src, Location::new(5, 0), -1), Location::Eof);
        assert_eq!(move_by(&mut src, Location::new(2, 0), 1), Location::Eof);
    }

    #[test]
    fn sentinels() {
        let mut src = Fixed::new(&[2, 3]);
        assert_eq!(move_by(&mut src, Location::Start, 1), Location::new(0, 0));
        assert_eq!(move_by(&mut src, Location::Start, 3), Location::new(1, 0));
        assert_eq!(move_by(&mut src, Location::Start, -4), Location::Start);
        assert_eq!(move_by(&mut src, Location::Eof, 1), Location::Eof);
        assert_eq!(move_by(&mut src, Location::Eof, -1), Location::new(1, 2));
        assert_eq!(move_by(&mut src, Location::Eof, -5), Location::new(0, 0));
        assert_eq!(move_by(&mut src, Location::Eof, -6), Location::Start);

        let mut empty = Fixed::new(&[]);
        assert_eq!(move_by(&mut empty, Location::new(0, 0), 1), Location::Eof);
        assert_eq!(move_by(&mut empty, Location::Start, 1), Location::Eof);
        assert_eq!(move_by(&mut empty, Location::Eof, -1), Location::Start);
    }

    #[test]
    fn extreme_deltas() {
        let mut src = Fixed::new(&[3, 2]);
        assert_eq!(move_by(&mut src, Location::new(0, 1), i64::MAX), Location::Eof);
        assert_eq!(move_by(&mut src, Location::new(1, 1), i64::MIN), Location::Start);
        assert_eq!(move_by(&mut src, Location::Start, i64::MAX), Location::Eof);
        assert_eq!(move_by(&mut src, Location::Eof, i64::MIN), Location::Start);
    }

    #[test]
    fn stale_line_is_clamped() {
        let mut src = Fixed::new(&[2, 2]);
        assert_eq!(move_by(&mut src, Location::new(0, 7), 1), Location::new(1, 0));
    }

    #[test]
    fn large_jumps_do_not_recurse() {
        let counts = vec![1; 200_000];
        let mut src = Fixed::new(&counts);
        assert_eq!(
            move_by(&mut src, Location::new(0, 0), 199_999),
            Location::new(199_999, 0)
        );
        assert_eq!(
            move_by(&mut src, Location::new(199_999, 0), -200_000),
            Location::Start
        );
    }

    fn file_and_location() -> impl Strategy<Value = (Vec<usize>, Location)> {
        prop::collection::vec(1usize..6, 1..12).prop_flat_map(|counts| {
            let n = counts.len();
            let c = counts.clone();
            (0..n)
                .prop_flat_map(move |r| (Just(r), 0..c[r]))
                .prop_map(move |(r, l)| (counts.clone(), Location::new(r, l)))
        })
    }

    proptest! {
        #[test]
        fn prop_moves_are_additive((counts, loc) in file_and_location(), d1 in -20i64..20, d2 in -20i64..20) {
            let mut src = Fixed::new(&counts);
            let mid = move_by(&mut src, loc, d1);
            prop_assume!(mid.is_data());
            let end = move_by(&mut src, mid, d2);
            prop_assume!(end.is_data());
            prop_assert_eq!(end, move_by(&mut src, loc, d1 + d2));
        }

        #[test]
        fn prop_forward_then_back((counts, loc) in file_and_location(), k in 0i64..30) {
            let mut src = Fixed::new(&counts);
            let there = move_by(&mut src, loc, k);
            prop_assume!(there != Location::Eof);
            prop_assert_eq!(move_by(&mut src, there, -k), loc);
        }

        #[test]
        fn prop_far_enough_is_eof((counts, loc) in file_and_location()) {
            let mut src = Fixed::new(&counts);
            let total: usize = counts.iter().sum();
            prop_assert_eq!(move_by(&mut src, loc, total as i64), Location::Eof);
        }

        #[test]
        fn prop_before_start(counts in prop::collection::vec(1usize..6, 1..12), k in 1i64..50) {
            let mut src = Fixed::new(&counts);
            prop_assert_eq!(move_by(&mut src, Location::new(0, 0), -k), Location::Start);
        }
    }
}
