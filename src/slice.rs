//! Slice descriptors for strided views.
//!
//! A multi-slice is one [`SliceSpec`] per axis. Integer selectors drop their
//! axis from the result, `Full` keeps an axis whole, and `Range` keeps a
//! (possibly reversed or stepped) sub-range of it.

use std::ops::{Range, RangeFull};

use crate::{Result, StridedError};

/// A strided range (start..end with step).
///
/// `end` is exclusive. A negative `step` walks from `start` down toward `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedRange {
    pub start: usize,
    pub end: usize,
    pub step: isize,
}

impl StridedRange {
    pub fn new(start: usize, end: usize, step: isize) -> Self {
        Self { start, end, step }
    }

    /// Number of positions selected.
    pub fn len(&self) -> usize {
        compute_slice_len(self.start, self.end, self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selector for a single axis of a multi-slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceSpec {
    /// Select a single position; the axis is removed from the result.
    Index(usize),
    /// Take every element along the axis.
    Full,
    /// Take a strided sub-range of the axis.
    Range(StridedRange),
}

impl SliceSpec {
    /// Whether this selector removes its axis from the result.
    #[inline]
    pub fn reduces_dim(&self) -> bool {
        matches!(self, SliceSpec::Index(_))
    }

    /// Resolve against an axis of extent `dim_size`.
    ///
    /// Returns `(start, len, step)` or an error if the selector does not fit
    /// inside the axis.
    pub(crate) fn resolve(&self, axis: usize, dim_size: usize) -> Result<(usize, usize, isize)> {
        match *self {
            SliceSpec::Index(index) => {
                if index >= dim_size {
                    return Err(StridedError::IndexOutOfBounds {
                        axis,
                        index,
                        dim: dim_size,
                    });
                }
                Ok((index, 1, 1))
            }
            SliceSpec::Full => Ok((0, dim_size, 1)),
            SliceSpec::Range(r) => {
                if r.step == 0 {
                    return Err(StridedError::ZeroStep { axis });
                }
                let len = r.len();
                if len == 0 {
                    return Ok((0, 0, r.step));
                }
                // The first and last visited positions must both lie inside the axis.
                let last = if r.step > 0 {
                    r.start + (len - 1) * r.step as usize
                } else {
                    r.start - (len - 1) * r.step.unsigned_abs()
                };
                let hi = r.start.max(last);
                if hi >= dim_size {
                    return Err(StridedError::IndexOutOfBounds {
                        axis,
                        index: hi,
                        dim: dim_size,
                    });
                }
                Ok((r.start, len, r.step))
            }
        }
    }
}

impl From<usize> for SliceSpec {
    fn from(index: usize) -> Self {
        SliceSpec::Index(index)
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        SliceSpec::Full
    }
}

impl From<Range<usize>> for SliceSpec {
    fn from(range: Range<usize>) -> Self {
        SliceSpec::Range(StridedRange::new(range.start, range.end, 1))
    }
}

impl From<StridedRange> for SliceSpec {
    fn from(range: StridedRange) -> Self {
        SliceSpec::Range(range)
    }
}

impl From<Option<usize>> for SliceSpec {
    /// `Some(i)` selects position `i`; `None` selects the full axis.
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(i) => SliceSpec::Index(i),
            None => SliceSpec::Full,
        }
    }
}

/// Build a multi-slice from fixed leading selectors followed by full axes.
///
/// The result has `rank` entries: `selectors` become [`SliceSpec::Index`]
/// and the remaining `rank - selectors.len()` axes are [`SliceSpec::Full`].
///
/// # Panics
/// Panics if `selectors.len() > rank`.
pub fn multislice(selectors: &[usize], rank: usize) -> Vec<SliceSpec> {
    assert!(
        selectors.len() <= rank,
        "{} selectors for rank {}",
        selectors.len(),
        rank
    );
    let mut spec = Vec::with_capacity(rank);
    spec.extend(selectors.iter().map(|&i| SliceSpec::Index(i)));
    spec.resize(rank, SliceSpec::Full);
    spec
}

fn compute_slice_len(start: usize, end: usize, step: isize) -> usize {
    if step > 0 {
        end.saturating_sub(start).div_ceil(step as usize)
    } else if step < 0 {
        start.saturating_sub(end).div_ceil(step.unsigned_abs())
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multislice() {
        let spec = multislice(&[1, 0], 4);
        assert_eq!(
            spec,
            vec![
                SliceSpec::Index(1),
                SliceSpec::Index(0),
                SliceSpec::Full,
                SliceSpec::Full
            ]
        );
    }

    #[test]
    fn test_multislice_all_fixed() {
        assert_eq!(
            multislice(&[2, 3], 2),
            vec![SliceSpec::Index(2), SliceSpec::Index(3)]
        );
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(SliceSpec::from(3usize), SliceSpec::Index(3));
        assert_eq!(SliceSpec::from(..), SliceSpec::Full);
        assert_eq!(
            SliceSpec::from(1..4),
            SliceSpec::Range(StridedRange::new(1, 4, 1))
        );
        assert_eq!(SliceSpec::from(None), SliceSpec::Full);
        assert_eq!(SliceSpec::from(Some(2)), SliceSpec::Index(2));
    }

    #[test]
    fn test_strided_range_len() {
        assert_eq!(StridedRange::new(0, 5, 2).len(), 3);
        assert_eq!(StridedRange::new(4, 0, -1).len(), 4);
        assert_eq!(StridedRange::new(3, 3, 1).len(), 0);
        assert!(StridedRange::new(2, 1, 1).is_empty());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(SliceSpec::Index(2).resolve(0, 3).unwrap(), (2, 1, 1));
        assert!(matches!(
            SliceSpec::Index(3).resolve(1, 3),
            Err(StridedError::IndexOutOfBounds {
                axis: 1,
                index: 3,
                dim: 3
            })
        ));
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(
            SliceSpec::Range(StridedRange::new(1, 6, 2))
                .resolve(0, 6)
                .unwrap(),
            (1, 3, 2)
        );
        assert_eq!(
            SliceSpec::Range(StridedRange::new(5, 0, -2))
                .resolve(0, 6)
                .unwrap(),
            (5, 3, -2)
        );
        assert!(SliceSpec::Range(StridedRange::new(0, 7, 1))
            .resolve(0, 6)
            .is_err());
        assert!(matches!(
            SliceSpec::Range(StridedRange::new(0, 2, 0)).resolve(2, 6),
            Err(StridedError::ZeroStep { axis: 2 })
        ));
    }

    #[test]
    fn test_resolve_empty_range() {
        assert_eq!(
            SliceSpec::Range(StridedRange::new(9, 9, 1))
                .resolve(0, 3)
                .unwrap(),
            (0, 0, 1)
        );
    }
}
