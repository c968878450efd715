//! Shape broadcasting across any number of strided views.
//!
//! Shapes are aligned from the trailing axis. Each aligned pair of extents
//! must be equal or one of them must be 1; missing leading axes count as 1.

use crate::view::StridedView;
use crate::{Result, StridedError};

/// Compute the broadcast shape for two shapes.
///
/// Returns `None` if the shapes are incompatible.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let max_rank = a.len().max(b.len());
    let mut result = vec![0usize; max_rank];

    for i in 0..max_rank {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        result[max_rank - 1 - i] = if a_dim == b_dim || b_dim == 1 {
            a_dim
        } else if a_dim == 1 {
            b_dim
        } else {
            return None;
        };
    }

    Some(result)
}

/// Compute the broadcast shape for any number of shapes.
///
/// An empty list broadcasts to the rank-0 shape. On failure the error names
/// the accumulated shape and the first shape that could not be merged into it.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let mut acc: Vec<usize> = Vec::new();
    for shape in shapes {
        acc = broadcast_shape(&acc, shape)
            .ok_or_else(|| StridedError::ShapeMismatch(acc.clone(), shape.to_vec()))?;
    }
    Ok(acc)
}

/// Broadcast a list of views to their common shape.
///
/// If every view already has the common shape the views are returned as-is
/// (cheap clones); otherwise each view is broadcast with stride-0 axes.
pub fn broadcast_views<'a, T>(views: &[StridedView<'a, T>]) -> Result<Vec<StridedView<'a, T>>> {
    let shapes: Vec<&[usize]> = views.iter().map(|v| v.dims()).collect();
    let shape = broadcast_shapes(&shapes)?;
    views
        .iter()
        .map(|v| {
            if v.dims() == shape.as_slice() {
                Ok(v.clone())
            } else {
                v.broadcast(&shape)
            }
        })
        .collect()
}
