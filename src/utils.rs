//! Small shared helpers: identifier masking for logs and randomized pacing.

use rand::Rng;
use std::time::Duration;

/// Render a secret identifier as a short masked form for logs and reports.
///
/// Secrets are never logged in full; only the first and last few characters
/// survive. Short values are masked entirely.
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.len() <= 10 {
        return "•".repeat(identifier.len());
    }
    format!(
        "{}…{}",
        &identifier[..6],
        &identifier[identifier.len() - 4..]
    )
}

/// Pick a uniformly random duration (in whole seconds) from an inclusive range.
pub fn random_pause(range: (u64, u64)) -> Duration {
    let (min, max) = range;
    let secs = if min >= max {
        min
    } else {
        rand::thread_rng().gen_range(min..=max)
    };
    Duration::from_secs(secs)
}

/// Sleep a uniformly random number of seconds from the configured range.
///
/// Every pacing delay in the system goes through here so that control always
/// yields back to the runtime and sibling account flows keep making progress.
pub async fn sleep_range(range: (u64, u64)) {
    tokio::time::sleep(random_pause(range)).await;
}
