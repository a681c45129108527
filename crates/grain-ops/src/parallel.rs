//! Frame-level parallelism using Rayon.
//!
//! Every grain stage is a pure function of a frame index, so whole frames
//! are the unit of work. Rows inside a frame stay sequential.
//!
//! # Example
//!
//! ```rust
//! use grain_ops::parallel;
//!
//! let squares = parallel::map_indices(8, |i| Ok(i * i)).unwrap();
//! assert_eq!(squares[7], 49);
//! ```

use crate::OpsResult;
use rayon::prelude::*;

/// Evaluates `f` for every index in `0..count` across the rayon pool.
///
/// Results come back in index order. The first error encountered is
/// returned and the remaining work is abandoned.
pub fn map_indices<T, F>(count: usize, f: F) -> OpsResult<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> OpsResult<T> + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;

    #[test]
    fn test_map_indices_keeps_order() {
        let out = map_indices(1000, |i| Ok(i as u64 * 3)).unwrap();
        assert!(out.iter().enumerate().all(|(i, v)| *v == i as u64 * 3));
    }

    #[test]
    fn test_map_indices_propagates_error() {
        let out: OpsResult<Vec<usize>> = map_indices(64, |i| {
            if i == 40 {
                Err(OpsError::Generator("frame 40".into()))
            } else {
                Ok(i)
            }
        });
        assert!(matches!(out, Err(OpsError::Generator(_))));
    }
}
