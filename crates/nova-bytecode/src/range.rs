use std::fmt;

use crate::error::{RangeError, Result};

/// A half-open `[from, to)` span of bytecode offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexRange {
    pub from: usize,
    pub to: usize,
}

impl IndexRange {
    #[inline]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.from <= offset && offset < self.to
    }
}

impl fmt::Debug for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexRange({}..{})", self.from, self.to)
    }
}

impl From<std::ops::Range<usize>> for IndexRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// The bytecode attributed to a group of source lines: ordered,
/// non-overlapping index ranges into one method's code array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexRanges {
    ranges: Vec<IndexRange>,
}

impl IndexRanges {
    /// Validates `ranges` against a code array of `code_len` bytes.
    pub fn new(
        ranges: impl IntoIterator<Item = impl Into<IndexRange>>,
        code_len: usize,
    ) -> Result<Self> {
        let ranges: Vec<IndexRange> = ranges.into_iter().map(Into::into).collect();
        let mut previous_end: Option<usize> = None;
        for range in &ranges {
            let IndexRange { from, to } = *range;
            if from > to {
                return Err(RangeError::Inverted { from, to });
            }
            if to > code_len {
                return Err(RangeError::OutOfBounds { from, to, code_len });
            }
            if let Some(previous_end) = previous_end {
                if from < previous_end {
                    return Err(RangeError::Overlapping {
                        from,
                        to,
                        previous_end,
                    });
                }
            }
            previous_end = Some(to);
        }
        Ok(Self { ranges })
    }

    /// Builds ranges from a flattened `[from0, to0, from1, to1, ...]` list, the
    /// shape line-location lookups produce.
    pub fn from_pairs(indexes: &[usize], code_len: usize) -> Result<Self> {
        if indexes.len() % 2 != 0 {
            return Err(RangeError::OddPairCount(indexes.len()));
        }
        Self::new(
            indexes
                .chunks_exact(2)
                .map(|pair| IndexRange::new(pair[0], pair[1])),
            code_len,
        )
    }

    /// Checks that every range still fits a code array of `code_len` bytes.
    pub fn check_within(&self, code_len: usize) -> Result<()> {
        match self.ranges.iter().find(|range| range.to > code_len) {
            Some(range) => Err(RangeError::OutOfBounds {
                from: range.from,
                to: range.to,
                code_len,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[IndexRange] {
        &self.ranges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexRange> {
        self.ranges.iter()
    }
}

impl<'a> IntoIterator for &'a IndexRanges {
    type Item = &'a IndexRange;
    type IntoIter = std::slice::Iter<'a, IndexRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordered_disjoint_ranges() {
        let ranges = IndexRanges::new([0..4, 4..4, 9..12], 12).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges.as_slice()[2], IndexRange::new(9, 12));
        assert!(IndexRanges::new(Vec::<IndexRange>::new(), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert_eq!(
            IndexRanges::new([5..2], 10),
            Err(RangeError::Inverted { from: 5, to: 2 })
        );
        assert_eq!(
            IndexRanges::new([0..11], 10),
            Err(RangeError::OutOfBounds {
                from: 0,
                to: 11,
                code_len: 10
            })
        );
        assert_eq!(
            IndexRanges::new([4..8, 6..9], 10),
            Err(RangeError::Overlapping {
                from: 6,
                to: 9,
                previous_end: 8
            })
        );
        assert_eq!(
            IndexRanges::new([4..8, 0..2], 10),
            Err(RangeError::Overlapping {
                from: 0,
                to: 2,
                previous_end: 8
            })
        );
    }

    #[test]
    fn flattened_pairs() {
        let ranges = IndexRanges::from_pairs(&[0, 3, 7, 9], 9).unwrap();
        assert_eq!(
            ranges.iter().copied().collect::<Vec<_>>(),
            vec![IndexRange::new(0, 3), IndexRange::new(7, 9)]
        );
        assert_eq!(
            IndexRanges::from_pairs(&[0, 3, 7], 9),
            Err(RangeError::OddPairCount(3))
        );
    }

    #[test]
    fn check_within_other_code_length() {
        let ranges = IndexRanges::new([0..3, 7..9], 9).unwrap();
        assert!(ranges.check_within(9).is_ok());
        assert!(matches!(
            ranges.check_within(8),
            Err(RangeError::OutOfBounds { from: 7, to: 9, .. })
        ));
    }
}
