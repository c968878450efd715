//! Interleaved iteration over subarray stacks of broadcast strided views.
//!
//! Several input arrays are broadcast to one shape; the iterator then hands
//! out the trailing `ndims`-dimensional subarrays of every input in turn,
//! round-robin, walking the remaining leading axes in row-major order.
//!
//! # Core Types
//!
//! - [`InterleaveSubarrays`]: The interleaving iterator
//! - [`StridedView`] / [`StridedArray`]: Read-only strided views and owned arrays
//! - [`SliceSpec`]: Per-axis slice selectors
//!
//! # Iterator Protocol
//!
//! - [`Iterator::next`]: Pull the next subarray (`None` once done, forever)
//! - [`StopIterator::stop`]: Finish early, optionally echoing a value
//! - [`Reiterable::reiter`]: Start an independent iterator from the beginning
//!
//! # Building Blocks
//!
//! - [`broadcast_shapes`], [`broadcast_views`]: Broadcasting across any number of inputs
//! - [`next_cartesian_index`]: Odometer-style counter over a range of axes
//! - [`multislice`]: Fixed leading selectors followed by full axes
//!
//! # Example
//!
//! ```rust
//! use strided_interleave::{interleave_subarrays, StopIterator, StridedArray};
//!
//! let x = StridedArray::<f64>::from_fn_row_major(&[2, 2, 2], |i| (i[0] * 4 + i[1] * 2 + i[2]) as f64);
//! let y = StridedArray::<f64>::row_major(&[2, 2]); // broadcast to [2, 2, 2]
//!
//! let mut it = interleave_subarrays(&[x.view(), y.view()], 2).unwrap();
//! assert_eq!(it.len(), 4);
//!
//! let first = it.next().unwrap();
//! assert_eq!(first.dims(), &[2, 2]);
//! assert_eq!(first.to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
//!
//! assert_eq!(it.stop(Some("early")), Some("early"));
//! assert!(it.next().is_none());
//! ```

pub mod broadcast;
#[cfg(feature = "ndarray")]
pub mod convert;
mod index;
mod interleave;
mod protocol;
mod slice;
pub mod view;

// ============================================================================
// Interleaving iterator
// ============================================================================
pub use interleave::{interleave_subarrays, InterleaveSubarrays};
pub use protocol::{Reiterable, StopIterator};

// ============================================================================
// View types and utilities
// ============================================================================
pub use slice::{multislice, SliceSpec, StridedRange};
pub use view::{col_major_strides, row_major_strides, StridedArray, StridedView};

// ============================================================================
// Broadcasting and index arithmetic
// ============================================================================
pub use broadcast::{broadcast_shape, broadcast_shapes, broadcast_views};
pub use index::{next_cartesian_index, numel, Order};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided view operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Slice selector outside of its axis.
    #[error("index {index} out of bounds for axis {axis} of size {dim}")]
    IndexOutOfBounds { axis: usize, index: usize, dim: usize },

    /// Strided range with step 0.
    #[error("zero step in slice for axis {axis}")]
    ZeroStep { axis: usize },

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Integer overflow while computing array offset.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,

    /// Invalid arguments to an iterator constructor.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Reasons an [`InterleaveSubarrays`] cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum InvalidArgument {
    #[error("first argument must be a non-empty array of strided views")]
    EmptyArrays,

    #[error("second argument must be a positive integer, got {0}")]
    InvalidNdims(usize),

    /// The broadcast failure is kept as the error source.
    #[error("arrays must be broadcast-compatible: {shapes:?}")]
    NotBroadcastCompatible {
        shapes: Vec<Vec<usize>>,
        #[source]
        source: Box<StridedError>,
    },

    #[error("each array must have at least {required} dimensions after broadcasting, got {rank}")]
    InsufficientRank { rank: usize, required: usize },

    #[error("interleaving {num_arrays} arrays of shape {shape:?} yields more subarrays than fit in usize")]
    TooLarge { shape: Vec<usize>, num_arrays: usize },
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
