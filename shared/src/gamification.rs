//! Gamification state machine
//!
//! Transitions are pure: [`apply_quest_transition`] takes a snapshot of one
//! user's state, quests for a date and earned badges, and returns a complete
//! new snapshot together with the events the transition produced. Persisting
//! the result is the caller's job.

use crate::calendar::is_previous_day;
use crate::errors::{EngineError, EngineResult};
use crate::leveling::{level_from_xp, LevelProgress};
use crate::models::{BadgeId, DailyMetrics, DailyQuest, GamificationState, QuestId, UserBadge};
use crate::validation::{validate_daily_metrics, validate_xp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// XP awarded once per date when every daily quest is complete
pub const DAILY_BONUS_XP: i64 = 25;

// ============================================================================
// Streaks
// ============================================================================

/// Completion streak after a full-completion day
///
/// No previous completion starts a streak of 1. The same day keeps it, the
/// following day extends it and any gap resets it to 1.
pub fn compute_streak(previous: u32, last_completed: Option<NaiveDate>, completed_on: NaiveDate) -> u32 {
    match last_completed {
        None => 1,
        Some(last) if last == completed_on => previous,
        Some(last) if is_previous_day(last, completed_on) => previous.saturating_add(1),
        Some(_) => 1,
    }
}

/// Badges a streak qualifies for
fn badges_for_streak(streak: u32) -> impl Iterator<Item = BadgeId> {
    [
        Some(BadgeId::FirstLog),
        (streak >= 3).then_some(BadgeId::Streak3),
        (streak >= 7).then_some(BadgeId::Streak7),
    ]
    .into_iter()
    .flatten()
}

// ============================================================================
// Daily quests
// ============================================================================

/// Result of ensuring a single quest template exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Make sure every quest template exists for `date`
///
/// Existing rows are kept as they are, completed or not. Returns the full
/// quest list in template order plus one outcome per template.
pub fn ensure_daily_quests(
    quests: &[DailyQuest],
    date: NaiveDate,
) -> EngineResult<(Vec<DailyQuest>, Vec<(QuestId, EnsureOutcome)>)> {
    check_quest_rows(quests, date)?;

    let mut ensured = Vec::with_capacity(QuestId::ALL.len());
    let mut outcomes = Vec::with_capacity(QuestId::ALL.len());

    for quest_id in QuestId::ALL {
        match quests.iter().find(|q| q.quest_id == quest_id) {
            Some(existing) => {
                ensured.push(existing.clone());
                outcomes.push((quest_id, EnsureOutcome::AlreadyExists));
            }
            None => {
                ensured.push(DailyQuest::from_template(quest_id, date));
                outcomes.push((quest_id, EnsureOutcome::Created));
            }
        }
    }

    Ok((ensured, outcomes))
}

fn check_quest_rows(quests: &[DailyQuest], date: NaiveDate) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for quest in quests {
        if quest.date != date {
            return Err(EngineError::invalid(format!(
                "quest {} is for {}, expected {}",
                quest.quest_id, quest.date, date
            )));
        }
        if !seen.insert(quest.quest_id) {
            return Err(EngineError::invalid(format!(
                "duplicate quest {} for {}",
                quest.quest_id, date
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Snapshot and transitions
// ============================================================================

/// Everything a transition reads and writes for one user and date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GamificationState,
    pub date: NaiveDate,
    pub quests: Vec<DailyQuest>,
    pub badges: Vec<UserBadge>,
}

impl GameSnapshot {
    /// Snapshot for a user with no stored state
    pub fn new(date: NaiveDate) -> Self {
        Self {
            state: GamificationState::default(),
            date,
            quests: Vec::new(),
            badges: Vec::new(),
        }
    }

    pub fn quest(&self, quest_id: QuestId) -> Option<&DailyQuest> {
        self.quests.iter().find(|q| q.quest_id == quest_id)
    }

    pub fn all_quests_complete(&self) -> bool {
        !self.quests.is_empty() && self.quests.iter().all(|q| q.completed)
    }

    pub fn has_badge(&self, badge_id: BadgeId) -> bool {
        self.badges.iter().any(|b| b.badge_id == badge_id)
    }

    pub fn level_progress(&self) -> EngineResult<LevelProgress> {
        level_from_xp(self.state.xp)
    }

    /// XP earned from completed quests today, bonus excluded
    pub fn quest_xp_earned(&self) -> u32 {
        self.quests
            .iter()
            .filter(|q| q.completed)
            .map(|q| q.xp_reward)
            .sum()
    }
}

/// A requested change to a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum QuestTransition {
    /// Only create missing quests
    Ensure,
    Complete(QuestId),
    Uncomplete(QuestId),
    /// Complete every quest the day's logs already satisfy
    SyncFromMetrics(DailyMetrics),
}

/// Something a transition did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    QuestCreated { quest_id: QuestId },
    QuestCompleted { quest_id: QuestId, xp_awarded: u32 },
    QuestUncompleted { quest_id: QuestId, xp_removed: i64 },
    DailyBonusAwarded { xp: i64, streak: u32 },
    BadgeEarned { badge_id: BadgeId },
    LevelChanged { from: u32, to: u32 },
}

impl GameEvent {
    /// Short notification text, `None` for bookkeeping events
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::QuestCreated { .. } => None,
            GameEvent::QuestCompleted { xp_awarded, .. } => Some(format!("✅ +{} XP", xp_awarded)),
            GameEvent::QuestUncompleted { xp_removed, .. } => Some(format!("↩️ -{} XP", xp_removed)),
            GameEvent::DailyBonusAwarded { xp, .. } => {
                Some(format!("🎉 Daily quests complete! +{} XP streak bonus!", xp))
            }
            GameEvent::BadgeEarned { badge_id } => {
                let badge = badge_id.badge();
                Some(format!("{} Badge earned: {}", badge.icon, badge.name))
            }
            GameEvent::LevelChanged { from, to } if to > from => {
                Some(format!("Level up! You reached level {}", to))
            }
            GameEvent::LevelChanged { .. } => None,
        }
    }
}

/// New snapshot plus the events that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub snapshot: GameSnapshot,
    pub events: Vec<GameEvent>,
}

impl TransitionOutcome {
    /// Whether anything needs to be persisted
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn bonus_awarded(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::DailyBonusAwarded { .. }))
    }

    pub fn new_badges(&self) -> impl Iterator<Item = BadgeId> + '_ {
        self.events.iter().filter_map(|e| match e {
            GameEvent::BadgeEarned { badge_id } => Some(*badge_id),
            _ => None,
        })
    }
}

/// Apply one transition to a snapshot for `date`
///
/// Quests are always ensured first. Completing a completed quest and
/// uncompleting an open one are no-ops. The bonus is awarded at most once per
/// date and never for a date before the last bonus date. On error the input
/// is left as it was and nothing is returned.
pub fn apply_quest_transition(
    snapshot: &GameSnapshot,
    date: NaiveDate,
    transition: &QuestTransition,
) -> EngineResult<TransitionOutcome> {
    if snapshot.date != date {
        return Err(EngineError::invalid(format!(
            "snapshot is for {}, transition is for {}",
            snapshot.date, date
        )));
    }
    validate_xp(snapshot.state.xp)?;

    let (quests, outcomes) = ensure_daily_quests(&snapshot.quests, date)?;
    let mut next = GameSnapshot {
        quests,
        ..snapshot.clone()
    };
    let mut events: Vec<GameEvent> = outcomes
        .into_iter()
        .filter(|(_, outcome)| *outcome == EnsureOutcome::Created)
        .map(|(quest_id, _)| GameEvent::QuestCreated { quest_id })
        .collect();

    let completed_any = match transition {
        QuestTransition::Ensure => false,
        QuestTransition::Complete(quest_id) => complete_quest(&mut next, *quest_id, &mut events)?,
        QuestTransition::Uncomplete(quest_id) => {
            uncomplete_quest(&mut next, *quest_id, &mut events)?;
            false
        }
        QuestTransition::SyncFromMetrics(metrics) => {
            if metrics.date != date {
                return Err(EngineError::invalid(format!(
                    "metrics are for {}, transition is for {}",
                    metrics.date, date
                )));
            }
            validate_daily_metrics(metrics)?;

            let mut completed_any = false;
            for quest_id in QuestId::ALL {
                if quest_id.is_satisfied_by(metrics) {
                    completed_any |= complete_quest(&mut next, quest_id, &mut events)?;
                }
            }
            completed_any
        }
    };

    if completed_any && next.all_quests_complete() && bonus_eligible(&next.state, date) {
        award_daily_bonus(&mut next, date, &mut events)?;
    }

    let level = level_from_xp(next.state.xp)?.level;
    if level != next.state.level {
        events.push(GameEvent::LevelChanged {
            from: next.state.level,
            to: level,
        });
        next.state.level = level;
    }

    Ok(TransitionOutcome {
        snapshot: next,
        events,
    })
}

fn quest_mut(snapshot: &mut GameSnapshot, quest_id: QuestId) -> EngineResult<&mut DailyQuest> {
    let date = snapshot.date;
    snapshot
        .quests
        .iter_mut()
        .find(|q| q.quest_id == quest_id)
        .ok_or_else(|| EngineError::invalid(format!("quest {} missing for {}", quest_id, date)))
}

/// Returns whether the quest was newly completed
fn complete_quest(
    snapshot: &mut GameSnapshot,
    quest_id: QuestId,
    events: &mut Vec<GameEvent>,
) -> EngineResult<bool> {
    let quest = quest_mut(snapshot, quest_id)?;
    if quest.completed {
        return Ok(false);
    }
    quest.completed = true;
    let reward = quest.xp_reward;

    snapshot.state.xp = add_xp(snapshot.state.xp, i64::from(reward))?;
    events.push(GameEvent::QuestCompleted {
        quest_id,
        xp_awarded: reward,
    });
    Ok(true)
}

fn uncomplete_quest(
    snapshot: &mut GameSnapshot,
    quest_id: QuestId,
    events: &mut Vec<GameEvent>,
) -> EngineResult<()> {
    let quest = quest_mut(snapshot, quest_id)?;
    if !quest.completed {
        return Ok(());
    }
    quest.completed = false;
    let reward = i64::from(quest.xp_reward);

    let before = snapshot.state.xp;
    snapshot.state.xp = (before - reward).max(0);
    events.push(GameEvent::QuestUncompleted {
        quest_id,
        xp_removed: before - snapshot.state.xp,
    });
    Ok(())
}

fn bonus_eligible(state: &GamificationState, date: NaiveDate) -> bool {
    state.last_completed_date.map_or(true, |last| date > last)
}

fn award_daily_bonus(
    snapshot: &mut GameSnapshot,
    date: NaiveDate,
    events: &mut Vec<GameEvent>,
) -> EngineResult<()> {
    let state = &mut snapshot.state;
    state.xp = add_xp(state.xp, DAILY_BONUS_XP)?;
    state.completion_streak = compute_streak(state.completion_streak, state.last_completed_date, date);
    state.last_completed_date = Some(date);
    let streak = state.completion_streak;

    events.push(GameEvent::DailyBonusAwarded {
        xp: DAILY_BONUS_XP,
        streak,
    });

    for badge_id in badges_for_streak(streak) {
        if !snapshot.has_badge(badge_id) {
            snapshot.badges.push(UserBadge {
                badge_id,
                earned_on: date,
            });
            events.push(GameEvent::BadgeEarned { badge_id });
        }
    }
    Ok(())
}

fn add_xp(xp: i64, amount: i64) -> EngineResult<i64> {
    xp.checked_add(amount)
        .ok_or_else(|| EngineError::invalid("xp total out of range"))
}
