//! Interleaved iteration over stacks of subarrays.
//!
//! Given `K` views broadcast to a common shape of rank `M` and a number of
//! trailing dimensions `ndims`, the axes split at `dim = M - ndims - 1`:
//!
//! - axes `0..dim` are outer axes, walked in row-major order,
//! - axis `dim` is the stacking axis,
//! - axes `dim+1..M` are kept whole in every yielded subarray.
//!
//! For each outer index and each stacking position the iterator yields the
//! corresponding subarray of view 0, then view 1, ..., then view `K-1`.
//!
//! # Example
//!
//! ```rust
//! use strided_interleave::{interleave_subarrays, StridedArray};
//!
//! let x = StridedArray::<i32>::from_fn_row_major(&[2, 2, 2], |i| (i[0] * 4 + i[1] * 2 + i[2]) as i32 + 1);
//! let y = StridedArray::<i32>::from_fn_row_major(&[2, 2, 2], |i| (i[0] * 4 + i[1] * 2 + i[2]) as i32 + 9);
//!
//! let rows: Vec<Vec<i32>> = interleave_subarrays(&[x.view(), y.view()], 1)
//!     .unwrap()
//!     .map(|v| v.to_vec())
//!     .collect();
//! assert_eq!(rows[0], vec![1, 2]);
//! assert_eq!(rows[1], vec![9, 10]);
//! assert_eq!(rows[2], vec![3, 4]);
//! assert_eq!(rows.len(), 8);
//! ```

use std::iter::FusedIterator;

use log::{debug, trace};

use crate::broadcast::broadcast_views;
use crate::index::{next_cartesian_index, Order};
use crate::protocol::{Reiterable, StopIterator};
use crate::slice::{multislice, SliceSpec};
use crate::view::StridedView;
use crate::{InvalidArgument, Result};

/// Per-view position: selectors for the outer axes and the stacking axis.
///
/// The kept trailing axes have no selector; they become
/// [`SliceSpec::Full`] when the slice is built.
#[derive(Debug, Clone)]
struct IndexState {
    selectors: Vec<usize>,
}

impl IndexState {
    fn new(dim: usize) -> Self {
        Self {
            selectors: vec![0; dim + 1],
        }
    }

    fn multislice(&self, rank: usize) -> Vec<SliceSpec> {
        multislice(&self.selectors, rank)
    }

    /// Step to the next stacking position, rolling the outer axes over when
    /// the stack is exhausted.
    fn advance(&mut self, shape: &[usize], dim: usize, stack_len: usize) {
        let j = (self.selectors[dim] + 1) % stack_len;
        self.selectors[dim] = j;
        if j == 0 && dim > 0 {
            next_cartesian_index(
                &shape[..=dim],
                Order::RowMajor,
                &mut self.selectors,
                dim - 1,
            );
        }
    }
}

/// Iterator over interleaved subarrays of broadcast views.
///
/// Yields `K * shape[0] * ... * shape[dim]` read-only views of rank `ndims`,
/// cycling through the input views on every pull. Nothing is yielded if the
/// broadcast shape has no elements.
///
/// Pulling takes `&mut self`, so one instance is never advanced from two
/// threads at once; independent instances from [`Reiterable::reiter`] share
/// no state.
pub struct InterleaveSubarrays<'a, T> {
    /// Inputs as given, before broadcasting.
    arrays: Vec<StridedView<'a, T>>,
    ndims: usize,
    /// Inputs broadcast to `shape`.
    list: Vec<StridedView<'a, T>>,
    shape: Vec<usize>,
    dim: usize,
    stack_len: usize,
    total: usize,
    indices: Vec<IndexState>,
    emitted: usize,
    slot: usize,
    done: bool,
}

impl<T> std::fmt::Debug for InterleaveSubarrays<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterleaveSubarrays")
            .field("shape", &self.shape)
            .field("ndims", &self.ndims)
            .field("num_arrays", &self.list.len())
            .field("total", &self.total)
            .field("emitted", &self.emitted)
            .field("done", &self.done)
            .finish()
    }
}

impl<'a, T> InterleaveSubarrays<'a, T> {
    /// Create an iterator over the interleaved `ndims`-dimensional subarrays
    /// of `arrays`.
    ///
    /// # Errors
    /// Returns [`StridedError::InvalidArgument`](crate::StridedError::InvalidArgument) if
    /// - `arrays` is empty,
    /// - `ndims` is 0,
    /// - the views are not broadcast-compatible,
    /// - the broadcast rank is not greater than `ndims`,
    /// - the number of subarrays to yield does not fit in `usize`.
    pub fn new(arrays: &[StridedView<'a, T>], ndims: usize) -> Result<Self> {
        if arrays.is_empty() {
            return Err(InvalidArgument::EmptyArrays.into());
        }
        if ndims == 0 {
            return Err(InvalidArgument::InvalidNdims(ndims).into());
        }
        let list = broadcast_views(arrays).map_err(|source| {
            InvalidArgument::NotBroadcastCompatible {
                shapes: arrays.iter().map(|a| a.dims().to_vec()).collect(),
                source: Box::new(source),
            }
        })?;
        let num_arrays = list.len();
        let shape = list[0].dims().to_vec();
        let rank = shape.len();
        if rank <= ndims {
            return Err(InvalidArgument::InsufficientRank {
                rank,
                required: ndims + 1,
            }
            .into());
        }

        let dim = rank - ndims - 1;
        let stack_len = shape[dim];

        // An empty shape is done before any count is derived, so a zero
        // extent never reaches the stacking-axis modulus.
        let done = shape.contains(&0);
        let total = if done {
            0
        } else {
            shape[..=dim]
                .iter()
                .try_fold(num_arrays, |acc, &d| acc.checked_mul(d))
                .ok_or_else(|| InvalidArgument::TooLarge {
                    shape: shape.clone(),
                    num_arrays,
                })?
        };

        debug!(
            "interleaving {} views: shape={:?} ndims={} stacking_axis={} total={}",
            num_arrays, shape, ndims, dim, total
        );

        Ok(Self {
            arrays: arrays.to_vec(),
            ndims,
            list,
            shape,
            dim,
            stack_len,
            total,
            indices: vec![IndexState::new(dim); num_arrays],
            emitted: 0,
            slot: 0,
            done,
        })
    }

    /// Broadcast shape shared by every input.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of trailing dimensions in each yielded subarray.
    pub fn ndims(&self) -> usize {
        self.ndims
    }

    /// Number of input views.
    pub fn num_arrays(&self) -> usize {
        self.list.len()
    }

    /// Index of the stacking axis in the broadcast shape.
    pub fn stacking_axis(&self) -> usize {
        self.dim
    }

    /// Total number of subarrays yielded over the full iteration.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl<'a, T> Iterator for InterleaveSubarrays<'a, T> {
    type Item = StridedView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.emitted >= self.total {
            if !self.done {
                debug!("interleave exhausted after {} subarrays", self.emitted);
                self.done = true;
            }
            return None;
        }
        self.emitted += 1;

        let k = self.slot;
        self.slot = (self.slot + 1) % self.list.len();

        let state = &mut self.indices[k];
        let spec = state.multislice(self.shape.len());
        trace!("view {} at {:?}", k, state.selectors);
        state.advance(&self.shape, self.dim, self.stack_len);

        Some(self.list[k].slice(&spec))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for InterleaveSubarrays<'_, T> {
    fn len(&self) -> usize {
        if self.done {
            0
        } else {
            self.total - self.emitted
        }
    }
}

impl<T> FusedIterator for InterleaveSubarrays<'_, T> {}

impl<T> StopIterator for InterleaveSubarrays<'_, T> {
    fn stop<R>(&mut self, value: Option<R>) -> Option<R> {
        if !self.done {
            debug!(
                "interleave stopped after {} of {} subarrays",
                self.emitted, self.total
            );
            self.done = true;
        }
        value
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

impl<T> Reiterable for InterleaveSubarrays<'_, T> {
    /// Rebuild from the original inputs, re-running validation and broadcasting.
    fn reiter(&self) -> Result<Self> {
        Self::new(&self.arrays, self.ndims)
    }
}

/// Iterate over interleaved subarrays; see [`InterleaveSubarrays::new`].
pub fn interleave_subarrays<'a, T>(
    arrays: &[StridedView<'a, T>],
    ndims: usize,
) -> Result<InterleaveSubarrays<'a, T>> {
    InterleaveSubarrays::new(arrays, ndims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::StridedArray;
    use crate::StridedError;

    fn iota(dims: &[usize], start: i32) -> StridedArray<i32> {
        let mut next = start;
        StridedArray::from_fn_row_major(dims, |_| {
            let v = next;
            next += 1;
            v
        })
    }

    #[test]
    fn test_index_state_advance_stack_only() {
        let shape = [3, 4];
        let mut s = IndexState::new(0);
        s.advance(&shape, 0, 3);
        assert_eq!(s.selectors, vec![1]);
        s.advance(&shape, 0, 3);
        s.advance(&shape, 0, 3);
        assert_eq!(s.selectors, vec![0]);
    }

    #[test]
    fn test_index_state_advance_carries_into_outer_axes() {
        let shape = [2, 3, 2, 5];
        let mut s = IndexState::new(2);
        s.selectors = vec![0, 2, 1];
        s.advance(&shape, 2, 2);
        assert_eq!(s.selectors, vec![1, 0, 0]);
    }

    #[test]
    fn test_index_state_multislice() {
        let mut s = IndexState::new(1);
        s.selectors = vec![1, 0];
        assert_eq!(
            s.multislice(4),
            vec![
                SliceSpec::Index(1),
                SliceSpec::Index(0),
                SliceSpec::Full,
                SliceSpec::Full
            ]
        );
    }

    #[test]
    fn test_metadata() {
        let x = iota(&[3, 4, 5], 0);
        let it = InterleaveSubarrays::new(&[x.view(), x.view()], 1).unwrap();
        assert_eq!(it.shape(), &[3, 4, 5]);
        assert_eq!(it.ndims(), 1);
        assert_eq!(it.num_arrays(), 2);
        assert_eq!(it.stacking_axis(), 1);
        assert_eq!(it.total(), 24);
        assert_eq!(it.len(), 24);
    }

    #[test]
    fn test_yields_views_of_rank_ndims() {
        let x = iota(&[2, 3, 4, 5], 0);
        for ndims in 1..4 {
            let it = InterleaveSubarrays::new(&[x.view()], ndims).unwrap();
            for v in it {
                assert_eq!(v.ndim(), ndims);
                assert_eq!(v.dims(), &x.dims()[4 - ndims..]);
            }
        }
    }

    #[test]
    fn test_len_tracks_progress() {
        let x = iota(&[2, 2, 2], 1);
        let mut it = InterleaveSubarrays::new(&[x.view()], 1).unwrap();
        assert_eq!(it.len(), 4);
        it.next();
        assert_eq!(it.len(), 3);
        it.stop::<()>(None);
        assert_eq!(it.len(), 0);
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: [StridedView<'_, i32>; 0] = [];
        assert!(matches!(
            InterleaveSubarrays::new(&empty, 1),
            Err(StridedError::InvalidArgument(InvalidArgument::EmptyArrays))
        ));
    }
}
