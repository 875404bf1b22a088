//! Uniform sampling helpers.
//!
//! Every random decision in a pass goes through these functions with an explicitly threaded
//! generator, so a seeded [`rand::rngs::StdRng`] reproduces a layout exactly.

use rand::Rng;

use crate::foundation::error::{ArchiveError, ArchiveResult};

/// Pick one element of `items` uniformly.
///
/// `what` names the set in the [`ArchiveError::EmptyInput`] error.
pub fn pick_one<'a, T, R>(rng: &mut R, items: &'a [T], what: &'static str) -> ArchiveResult<&'a T>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return Err(ArchiveError::EmptyInput(what));
    }
    Ok(&items[rng.random_range(0..items.len())])
}

/// Uniform value in `[min, max)`. Returns `min` when the range is empty.
pub fn range_value<R>(rng: &mut R, min: f64, max: f64) -> f64
where
    R: Rng + ?Sized,
{
    min + rng.random::<f64>() * (max - min)
}

/// `floor(range_value(min, max))`, i.e. an integer in `[min, max - 1]`.
pub fn range_count<R>(rng: &mut R, min: usize, max: usize) -> usize
where
    R: Rng + ?Sized,
{
    range_value(rng, min as f64, max as f64).floor().max(0.0) as usize
}

#[cfg(test)]
#[path = "../tests/unit/random.rs"]
mod tests;
