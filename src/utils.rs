use std::time::Duration;

use rand::Rng;

/// Delay before retry number `attempt + 1` of a data service call:
/// `base_delay_ms * 2^attempt`, capped at `max_delay_ms`, then spread by ±25 %
/// so clients that failed together do not retry together.
pub fn calculate_backoff_with_jitter(
  attempt: usize,
  base_delay_ms: u64,
  max_delay_ms: u64,
) -> Duration {
  let exponential_delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt as u32));

  let capped_delay = exponential_delay.min(max_delay_ms);

  let mut rng = rand::rng();
  let jitter_range = (capped_delay as f64 * 0.25) as u64;
  let jitter = rng.random_range(0..=jitter_range * 2);
  let final_delay = capped_delay.saturating_add(jitter).saturating_sub(jitter_range);

  Duration::from_millis(final_delay)
}
