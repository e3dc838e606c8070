//! Bounded, paced advancement of the result feed.

use std::time::Duration;

use mapgrab_core::RateLimitPolicy;

use crate::page::FeedProbe;
use crate::timing;

/// Advances the feed up to `policy.max_scroll_steps` times, stopping early
/// when the probe reports end of results. Returns the number of scroll
/// steps actually performed.
///
/// The end check runs before each step so a step is never wasted on an
/// exhausted feed. The probe is advisory: a failed check counts as "assume
/// more results" and a failed advance costs the step nothing but time —
/// neither aborts the calling session. With auto-scroll disabled this is a
/// deliberate no-op.
pub async fn auto_scroll<P: FeedProbe>(probe: &mut P, policy: &RateLimitPolicy) -> u32 {
    if !policy.auto_scroll_enabled {
        tracing::debug!("auto-scroll disabled, skipping");
        return 0;
    }

    let max_steps = policy.max_scroll_steps;
    tracing::debug!(max_steps, "starting auto-scroll");

    let mut steps_done = 0u32;
    for step in 1..=max_steps {
        let has_more = match probe.has_more_likely().await {
            Ok(has_more) => has_more,
            Err(err) => {
                tracing::debug!(error = %err, "end-of-results probe failed, assuming more");
                true
            }
        };
        if !has_more {
            tracing::info!(steps_done, "end of results reached");
            break;
        }

        if let Err(err) = probe.advance(policy.scroll_pixels_per_step).await {
            tracing::debug!(step, error = %err, "scroll advance failed");
        }

        let delay = timing::sample_uniform(
            policy.scroll_interval_min_secs,
            policy.scroll_interval_max_secs,
        );
        tracing::debug!(step, max_steps, delay_secs = delay, "scrolled");
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;

        steps_done = step;
    }

    tracing::debug!(steps_done, "auto-scroll finished");
    steps_done
}
