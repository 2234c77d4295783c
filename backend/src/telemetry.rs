//! Prometheus metrics for the gamification service
//!
//! Counters go through the `metrics` facade and are no-ops until a recorder is
//! installed with [`install_prometheus`].

use anyhow::Result;
use metrics::{counter, describe_counter, Counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

const QUESTS_COMPLETED: &str = "fitquest_quests_completed_total";
const QUESTS_UNCOMPLETED: &str = "fitquest_quests_uncompleted_total";
const DAILY_BONUSES: &str = "fitquest_daily_bonuses_total";
const BADGES_EARNED: &str = "fitquest_badges_earned_total";
const STATE_CONFLICTS: &str = "fitquest_state_conflicts_total";

/// Install the global Prometheus recorder and describe every counter
///
/// Call once at startup. A second call fails because the recorder is global.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!(QUESTS_COMPLETED, "Daily quests completed");
    describe_counter!(QUESTS_UNCOMPLETED, "Daily quests marked not done again");
    describe_counter!(DAILY_BONUSES, "All-quests-complete bonuses awarded");
    describe_counter!(BADGES_EARNED, "Badges awarded");
    describe_counter!(STATE_CONFLICTS, "Lost optimistic-concurrency races on gamification state");

    Ok(handle)
}

/// Labels: `quest`.
pub fn quests_completed(quest: &'static str) -> Counter {
    counter!(QUESTS_COMPLETED, "quest" => quest)
}

/// Labels: `quest`.
pub fn quests_uncompleted(quest: &'static str) -> Counter {
    counter!(QUESTS_UNCOMPLETED, "quest" => quest)
}

pub fn daily_bonuses() -> Counter {
    counter!(DAILY_BONUSES)
}

/// Labels: `badge`.
pub fn badges_earned(badge: &'static str) -> Counter {
    counter!(BADGES_EARNED, "badge" => badge)
}

/// Labels: `operation`.
pub fn state_conflicts(operation: &'static str) -> Counter {
    counter!(STATE_CONFLICTS, "operation" => operation)
}
