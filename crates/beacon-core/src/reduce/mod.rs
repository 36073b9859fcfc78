//! Element-wise reductions over two equally shaped sequences.
use std::{iter::Sum, ops::Add};

use crate::error::CoreError;

/// Element-wise sum: `out[k] = i[k] + j[k]`.
pub fn add_elementwise<T>(i: &[T], j: &[T]) -> Result<Vec<T>, CoreError>
where
    T: Copy + Add<Output = T>,
{
    check_shape(i, j)?;
    Ok(i.iter().zip(j).map(|(&a, &b)| a + b).collect())
}

/// Scalar total of the element-wise sum: `Σ (i[k] + j[k])`.
///
/// Empty inputs yield the additive identity of `T`.
pub fn sum_pairwise<T>(i: &[T], j: &[T]) -> Result<T, CoreError>
where
    T: Copy + Add<Output = T> + Sum<T>,
{
    check_shape(i, j)?;
    Ok(i.iter().zip(j).map(|(&a, &b)| a + b).sum())
}

#[inline]
fn check_shape<T>(i: &[T], j: &[T]) -> Result<(), CoreError> {
    if i.len() != j.len() {
        return Err(CoreError::ShapeMismatch {
            left: i.len(),
            right: j.len(),
        });
    }
    Ok(())
}
