//! Splitting records into fixed-capacity columns

use std::slice::Chunks;

use super::error::LayoutError;

/// Split `items` into consecutive groups of `size`.
///
/// Every group has exactly `size` items except possibly the last. The result
/// is a lazy iterator over borrowed slices and can be recreated at will.
pub fn chunk<T>(items: &[T], size: usize) -> Result<Chunks<'_, T>, LayoutError> {
    if size == 0 {
        return Err(LayoutError::InvalidChunkSize { size });
    }
    Ok(items.chunks(size))
}

/// Convert a configured column capacity into a chunk size
pub fn column_capacity(value: f64) -> Result<usize, LayoutError> {
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(LayoutError::InvalidColumnCapacity { value });
    }
    Ok(value as usize)
}
