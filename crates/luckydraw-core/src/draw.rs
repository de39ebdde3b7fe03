// Draw engine: pool construction, exclusion filtering, Fisher–Yates shuffle,
// and selection of the first N numbers.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::config::DrawConfig;
use crate::error::LotteryError;

/// Every integer in `[config.min, config.max]` that is not in `exclude`,
/// in ascending order.
pub fn build_pool(config: &DrawConfig, exclude: &BTreeSet<i64>) -> Vec<i64> {
    if config.max < config.min {
        return Vec::new();
    }
    (config.min..=config.max)
        .filter(|n| !exclude.contains(n))
        .collect()
}

/// Unbiased in-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Draw `config.draw_count` distinct numbers from `[min, max]` minus
/// `exclude`, sorted ascending.
pub fn draw<R: Rng + ?Sized>(
    config: &DrawConfig,
    exclude: &BTreeSet<i64>,
    rng: &mut R,
) -> Result<Vec<i64>, LotteryError> {
    config.validate()?;
    select(config.draw_count as usize, config, exclude, rng)
}

/// Draw `absent_count` replacement numbers. `exclude` must already hold the
/// awarded, displayed and absent numbers of the round.
pub fn redraw<R: Rng + ?Sized>(
    absent_count: usize,
    config: &DrawConfig,
    exclude: &BTreeSet<i64>,
    rng: &mut R,
) -> Result<Vec<i64>, LotteryError> {
    config.validate()?;
    if absent_count == 0 {
        return Ok(Vec::new());
    }
    select(absent_count, config, exclude, rng)
}

fn select<R: Rng + ?Sized>(
    count: usize,
    config: &DrawConfig,
    exclude: &BTreeSet<i64>,
    rng: &mut R,
) -> Result<Vec<i64>, LotteryError> {
    let mut pool = build_pool(config, exclude);
    if pool.len() < count {
        return Err(LotteryError::InsufficientPool {
            remaining: pool.len(),
            requested: count,
        });
    }

    shuffle(&mut pool, rng);
    pool.truncate(count);
    pool.sort_unstable();

    debug!(
        "Selected {} of {}..={} ({} excluded): {:?}",
        count,
        config.min,
        config.max,
        exclude.len(),
        pool
    );
    Ok(pool)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
