//! Roster update engine: one participant action against one snapshot.
//!
//! Both lists are append-only FIFO. Capacity is re-checked on every insert,
//! so a level change is a removal followed by a fresh registration and can
//! land the player on the waitlist if the roster filled up in between.

use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::identity::normalize;
use crate::domain::{Action, GameSnapshot, Participant};

pub struct ApplyOutcome {
    pub snapshot: GameSnapshot,
    pub notification: Option<String>,
}

/// Apply one action. Never fails: unknown identities cancelling are a no-op,
/// full rosters overflow into the waitlist.
pub fn apply(
    mut snapshot: GameSnapshot,
    display_name: &str,
    action: Action,
    now: DateTime<Utc>,
) -> ApplyOutcome {
    let identity = normalize(display_name);
    let in_main = snapshot.main_index_of(&identity);
    let in_waitlist = snapshot.waitlist_index_of(&identity);

    match action {
        Action::NotComing => cancel(snapshot, &identity, in_main, in_waitlist),
        Action::Register(level) => {
            // Re-submitting the identical label toggles the registration off.
            let same_label = in_main
                .map(|idx| snapshot.main_roster[idx].skill_level == level)
                .or_else(|| in_waitlist.map(|idx| snapshot.waitlist[idx].skill_level == level))
                .unwrap_or(false);
            if same_label {
                debug!("toggle-off for {}", identity);
                return cancel(snapshot, &identity, in_main, in_waitlist);
            }

            if in_main.is_some() || in_waitlist.is_some() {
                remove(&mut snapshot, in_main, in_waitlist);
            }

            let mut player = Participant::new(display_name, level);
            player.joined_at = Some(now);

            if snapshot.is_full() {
                snapshot.waitlist.push(player);
                let notification = format!(
                    "Основной состав заполнен. {} добавлен в waitlist.",
                    display_name
                );
                ApplyOutcome {
                    snapshot,
                    notification: Some(notification),
                }
            } else {
                snapshot.main_roster.push(player);
                ApplyOutcome {
                    snapshot,
                    notification: None,
                }
            }
        }
    }
}

fn cancel(
    mut snapshot: GameSnapshot,
    identity: &str,
    in_main: Option<usize>,
    in_waitlist: Option<usize>,
) -> ApplyOutcome {
    if in_main.is_none() && in_waitlist.is_none() {
        debug!("cancel for unknown identity {}, no-op", identity);
        return ApplyOutcome {
            snapshot,
            notification: None,
        };
    }

    let removed_from_main = in_main.map(|idx| snapshot.main_roster.remove(idx));
    if let Some(idx) = in_waitlist {
        snapshot.waitlist.remove(idx);
    }

    let notification = removed_from_main.map(|removed| {
        if snapshot.waitlist.is_empty() {
            format!("{} отменил запись.", removed.display_name)
        } else {
            let promoted = snapshot.waitlist.remove(0);
            let message = format!(
                "{} отменил запись. {} переходит в основной состав!",
                removed.display_name, promoted.display_name
            );
            snapshot.main_roster.push(promoted);
            message
        }
    });

    ApplyOutcome {
        snapshot,
        notification,
    }
}

fn remove(snapshot: &mut GameSnapshot, in_main: Option<usize>, in_waitlist: Option<usize>) {
    if let Some(idx) = in_main {
        snapshot.main_roster.remove(idx);
    }
    if let Some(idx) = in_waitlist {
        snapshot.waitlist.remove(idx);
    }
}
