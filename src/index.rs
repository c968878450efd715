//! Multi-dimensional index arithmetic.
//!
//! Element counts and an odometer-style counter over a range of axes, used to
//! walk the outer axes of a broadcast shape and to gather views element by
//! element.

/// Memory/iteration order for multi-dimensional counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Last index varies fastest (C default).
    #[default]
    RowMajor,
    /// First index varies fastest (Julia/Fortran default).
    ColumnMajor,
}

/// Number of elements described by `dims`.
///
/// Returns 0 if any extent is 0, and 1 for the rank-0 shape.
#[inline]
pub fn numel(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Advance `index` to the next cartesian index in `order`, starting at axis `dim`.
///
/// For [`Order::RowMajor`] axis `dim` is incremented first and overflow carries
/// toward axis 0; axes after `dim` are left untouched. For
/// [`Order::ColumnMajor`] axis `dim` is incremented first and overflow carries
/// toward the last axis; axes before `dim` are left untouched.
///
/// Returns `true` if every visited axis overflowed, i.e. the counter wrapped
/// back to all zeros over the visited range. An axis with extent 0 always
/// overflows.
///
/// # Panics
/// Panics if `index.len() != dims.len()` or `dim >= dims.len()`.
///
/// # Example
/// ```
/// use strided_interleave::{next_cartesian_index, Order};
///
/// let dims = [2, 3];
/// let mut idx = [0, 2];
/// assert!(!next_cartesian_index(&dims, Order::RowMajor, &mut idx, 1));
/// assert_eq!(idx, [1, 0]);
/// ```
pub fn next_cartesian_index(
    dims: &[usize],
    order: Order,
    index: &mut [usize],
    dim: usize,
) -> bool {
    assert_eq!(index.len(), dims.len(), "index and dims length mismatch");
    assert!(
        dim < dims.len(),
        "axis {} out of bounds for rank {}",
        dim,
        dims.len()
    );
    match order {
        Order::RowMajor => {
            for axis in (0..=dim).rev() {
                if bump(dims, index, axis) {
                    return false;
                }
            }
        }
        Order::ColumnMajor => {
            for axis in dim..dims.len() {
                if bump(dims, index, axis) {
                    return false;
                }
            }
        }
    }
    true
}

/// Increment one axis; on overflow reset it to 0 and report `false`.
#[inline]
fn bump(dims: &[usize], index: &mut [usize], axis: usize) -> bool {
    index[axis] += 1;
    if index[axis] < dims[axis] {
        return true;
    }
    index[axis] = 0;
    false
}
