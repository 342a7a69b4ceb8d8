//! Linear maximum scan over a slice.

use crate::error::{Error, Result};

/// The literal list the `max_scan` tool falls back to.
pub const DEFAULT_LIST: [i64; 7] = [3, 5, 19, 34, 12, 32, 12];

/// Returns the largest element of `values`.
///
/// The running maximum is seeded with the first element, so negative-only
/// input is handled without a sentinel. For incomparable values (NaN) the
/// earlier element is kept.
pub fn max_value<T: PartialOrd + Copy>(values: &[T]) -> Result<T> {
    let (&first, rest) = values.split_first().ok_or(Error::EmptyInput)?;
    let mut max = first;
    for &v in rest {
        if v > max {
            max = v;
        }
    }
    Ok(max)
}
