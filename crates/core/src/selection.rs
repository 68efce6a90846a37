//! Question-draw primitives for session composition.
//!
//! The composer narrows the store's candidates to a small window and then
//! draws uniformly at random from it, so equally-eligible questions are
//! equally likely to appear. Draws remove the picked element, letting one
//! pool serve several slots without repeats inside a session.

use rand::Rng;

/// Upper bound on questions in one composed session (one per skill area).
pub const SESSION_MAX_QUESTIONS: usize = 4;

/// Default number of newest eligible questions the store hands the composer
/// to draw from.
pub const DEFAULT_CANDIDATE_WINDOW: i64 = 10;

/// Which pool a composed question was drawn from.
///
/// `Repeat` marks the fallback taken when every eligible question was
/// recently seen and the pool had to be widened to include them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPool {
    Fresh,
    Repeat,
}

/// Draw one element uniformly at random, removing it from the pool.
///
/// Returns `None` on an empty pool. Order of the remaining elements is not
/// preserved.
pub fn draw_uniform<T, R: Rng + ?Sized>(rng: &mut R, pool: &mut Vec<T>) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pool.len());
    Some(pool.swap_remove(index))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
