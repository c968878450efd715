//! Zero-copy adapters from `ndarray` arrays to [`StridedView`].
//!
//! Dims and strides are passed through directly, so an ndarray input can be
//! fed to [`InterleaveSubarrays`](crate::InterleaveSubarrays) without copying.

use ndarray::{ArrayD, ArrayViewD};

use crate::view::StridedView;
use crate::Result;

/// Compute the min and max element-offset reachable from index [0,0,...,0].
///
/// For non-negative strides the min is 0; for negative strides (reversed views)
/// the min can be negative relative to `as_ptr()`.
fn compute_offset_range(shape: &[usize], strides: &[isize]) -> (isize, isize) {
    let mut min_off: isize = 0;
    let mut max_off: isize = 0;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        let end = s * (d as isize - 1);
        if end < 0 {
            min_off += end;
        } else {
            max_off += end;
        }
    }
    (min_off, max_off)
}

/// Build a view from an ndarray base pointer, shape and strides.
///
/// # Safety
/// `ptr` must be the address of element `[0, ..., 0]` of a live array with
/// the given shape and strides, valid for reads for `'a`.
unsafe fn raw_to_strided_view<'a, T>(
    ptr: *const T,
    shape: &[usize],
    strides: &[isize],
) -> Result<StridedView<'a, T>> {
    if shape.contains(&0) {
        return StridedView::new(&[], shape, strides, 0);
    }
    let (min_off, max_off) = compute_offset_range(shape, strides);
    let base_ptr = ptr.offset(min_off);
    let data_len = (max_off - min_off + 1) as usize;
    let data = std::slice::from_raw_parts(base_ptr, data_len);
    StridedView::new(data, shape, strides, -min_off)
}

/// Wrap an ndarray `ArrayD<T>` as a `StridedView` (zero-copy).
pub fn array_to_strided_view<T>(arr: &ArrayD<T>) -> Result<StridedView<'_, T>> {
    // SAFETY: the pointer, shape and strides all come from `arr`, which
    // outlives the returned view.
    unsafe { raw_to_strided_view(arr.as_ptr(), arr.shape(), arr.strides()) }
}

/// Wrap an ndarray `ArrayViewD<T>` as a `StridedView` (zero-copy).
pub fn view_to_strided_view<'a, T>(view: &ArrayViewD<'a, T>) -> Result<StridedView<'a, T>> {
    // SAFETY: the view borrows its data for `'a`.
    unsafe { raw_to_strided_view(view.as_ptr(), view.shape(), view.strides()) }
}
