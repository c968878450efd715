//! Dynamic-rank strided view types.
//!
//! - [`StridedView`]: Read-only dynamic-rank strided view over borrowed data
//! - [`StridedArray`]: Owned strided multidimensional array
//!
//! Views never copy: slicing and broadcasting only rewrite dims, strides and
//! the base offset.

use std::sync::Arc;

use crate::index::{next_cartesian_index, numel, Order};
use crate::slice::SliceSpec;
use crate::{Result, StridedError};

// ============================================================================
// Validation helpers
// ============================================================================

/// Check that every offset reachable through `dims`/`strides` from `offset`
/// lands inside a buffer of `len` elements.
///
/// Shapes with a zero extent reach nothing and always pass. Stride-0 axes
/// contribute nothing to the reachable range, so a broadcast shape of any
/// size fits over a single element.
fn validate_bounds(len: usize, dims: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    if dims.contains(&0) {
        return Ok(());
    }
    let (lo, hi) = dims
        .iter()
        .zip(strides)
        .filter(|&(&d, &s)| d > 1 && s != 0)
        .try_fold((offset, offset), |(lo, hi), (&d, &s)| -> Result<(isize, isize)> {
            let span = isize::try_from(d - 1)
                .ok()
                .and_then(|n| n.checked_mul(s))
                .ok_or(StridedError::OffsetOverflow)?;
            if span > 0 {
                Ok((lo, hi.checked_add(span).ok_or(StridedError::OffsetOverflow)?))
            } else {
                Ok((lo.checked_add(span).ok_or(StridedError::OffsetOverflow)?, hi))
            }
        })?;
    match usize::try_from(hi) {
        Ok(hi) if lo >= 0 && hi < len => Ok(()),
        _ => Err(StridedError::OffsetOverflow),
    }
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

// ============================================================================
// StridedView
// ============================================================================

/// Dynamic-rank read-only strided view.
///
/// There is no way to write through a `StridedView`; every view handed out by
/// slicing or broadcasting is read-only by construction. Cloning a view is
/// cheap (dims and strides are shared).
///
/// # Type Parameters
/// - `'a`: Lifetime of the underlying data
/// - `T`: Element type
pub struct StridedView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a new read-only strided view from a borrowed slice.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Create a row-major view covering all of `data`.
    pub fn from_slice(data: &'a [T], dims: &[usize]) -> Result<Self> {
        let total = numel(dims);
        if total != data.len() {
            return Err(StridedError::ShapeMismatch(vec![data.len()], dims.to_vec()));
        }
        Self::new(data, dims, &row_major_strides(dims), 0)
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        numel(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Apply a multi-slice, checking every selector against its axis.
    ///
    /// `spec` must hold exactly one [`SliceSpec`] per axis. Index selectors
    /// drop their axis, so the result has rank
    /// `ndim() - (number of index selectors)`.
    pub fn try_slice(&self, spec: &[SliceSpec]) -> Result<StridedView<'a, T>> {
        let rank = self.ndim();
        if spec.len() != rank {
            return Err(StridedError::RankMismatch(spec.len(), rank));
        }
        let mut dims = Vec::with_capacity(rank);
        let mut strides = Vec::with_capacity(rank);
        let mut offset = self.offset;
        for (axis, s) in spec.iter().enumerate() {
            let (start, len, step) = s.resolve(axis, self.dims[axis])?;
            offset += start as isize * self.strides[axis];
            if !s.reduces_dim() {
                dims.push(len);
                strides.push(self.strides[axis] * step);
            }
        }
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Apply a multi-slice.
    ///
    /// # Panics
    /// Panics if the slice does not fit this view; see [`Self::try_slice`].
    pub fn slice(&self, spec: &[SliceSpec]) -> StridedView<'a, T> {
        match self.try_slice(spec) {
            Ok(view) => view,
            Err(err) => panic!("invalid slice {spec:?} for dims {:?}: {err}", self.dims),
        }
    }

    /// Broadcast this view to a target shape.
    ///
    /// The view's axes are aligned with the trailing axes of `target_dims`.
    /// Size-1 dimensions are expanded (stride set to 0), and leading axes
    /// missing from the view are added with stride 0.
    pub fn broadcast(&self, target_dims: &[usize]) -> Result<StridedView<'a, T>> {
        let rank = self.dims.len();
        if target_dims.len() < rank {
            return Err(StridedError::RankMismatch(rank, target_dims.len()));
        }
        let lead = target_dims.len() - rank;
        let mut new_strides = vec![0isize; target_dims.len()];
        for i in 0..rank {
            let new_dim = target_dims[lead + i];
            if self.dims[i] == new_dim {
                new_strides[lead + i] = self.strides[i];
            } else if self.dims[i] != 1 {
                return Err(StridedError::ShapeMismatch(
                    self.dims.to_vec(),
                    target_dims.to_vec(),
                ));
            }
        }
        Ok(StridedView {
            data: self.data,
            dims: Arc::from(target_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }
}

impl<'a, T: Copy> StridedView<'a, T> {
    /// Get an element.
    ///
    /// # Panics
    /// Panics on a wrong number of indices or an out-of-bounds index.
    pub fn get(&self, indices: &[usize]) -> T {
        assert_eq!(indices.len(), self.dims.len(), "wrong number of indices");
        let mut idx = self.offset;
        for (i, &index) in indices.iter().enumerate() {
            assert!(
                index < self.dims[i],
                "index {} out of bounds for dim {}",
                index,
                self.dims[i]
            );
            idx += index as isize * self.strides[i];
        }
        self.data[idx as usize]
    }

    /// Gather the elements of this view in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        let total = self.len();
        let mut out = Vec::with_capacity(total);
        if total == 0 {
            return out;
        }
        let rank = self.ndim();
        let mut idx = vec![0usize; rank];
        loop {
            out.push(self.get(&idx));
            if rank == 0
                || next_cartesian_index(&self.dims, Order::RowMajor, &mut idx, rank - 1)
            {
                break;
            }
        }
        out
    }
}

// ============================================================================
// StridedArray
// ============================================================================

/// Owned strided multidimensional array.
///
/// Supports both row-major and column-major layouts.
pub struct StridedArray<T> {
    data: Vec<T>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T: Clone> Clone for StridedArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Clone + Default> StridedArray<T> {
    /// Create a row-major array filled with default values.
    pub fn row_major(dims: &[usize]) -> Self {
        let data = vec![T::default(); numel(dims)];
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a column-major array filled with default values.
    pub fn col_major(dims: &[usize]) -> Self {
        let data = vec![T::default(); numel(dims)];
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(col_major_strides(dims)),
            offset: 0,
        }
    }
}

impl<T> StridedArray<T> {
    /// Create a row-major array with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn_row_major(dims: &[usize], f: impl FnMut(&[usize]) -> T) -> Self {
        let data = collect_in_order(dims, Order::RowMajor, f);
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create a column-major array with values produced by a function.
    ///
    /// The function is called with indices in column-major iteration order.
    pub fn from_fn_col_major(dims: &[usize], f: impl FnMut(&[usize]) -> T) -> Self {
        let data = collect_in_order(dims, Order::ColumnMajor, f);
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(col_major_strides(dims)),
            offset: 0,
        }
    }

    /// Create from raw parts.
    pub fn from_parts(
        data: Vec<T>,
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        validate_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        numel(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Create a read-only view over this array.
    pub fn view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Copy> StridedArray<T> {
    /// Get an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.view().get(indices)
    }
}

impl<'a, T> From<&'a StridedArray<T>> for StridedView<'a, T> {
    fn from(array: &'a StridedArray<T>) -> Self {
        array.view()
    }
}

fn collect_in_order<T>(dims: &[usize], order: Order, mut f: impl FnMut(&[usize]) -> T) -> Vec<T> {
    let total = numel(dims);
    let mut data = Vec::with_capacity(total);
    if total == 0 {
        return data;
    }
    let rank = dims.len();
    let start = match order {
        Order::RowMajor => rank.saturating_sub(1),
        Order::ColumnMajor => 0,
    };
    let mut idx = vec![0usize; rank];
    loop {
        data.push(f(&idx));
        if rank == 0 || next_cartesian_index(dims, order, &mut idx, start) {
            break;
        }
    }
    data
}

// ============================================================================
// Tests
// ============================================================================
