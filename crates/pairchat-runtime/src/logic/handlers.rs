//! Engine Command and Event Handlers
//!
//! Pure state-transition functions: each takes the engine state and one
//! inbound message and returns the effects to emit. The engine task calls
//! them one at a time, so a whole match transaction (opposite-queue pop plus
//! link creation) completes without any other operation observing
//! intermediate state.

use tracing::warn;

use pairchat_core::channel::{Actor, Effect, Notice, RouteOutcome, COMMAND_PREFIX};
use pairchat_core::{Category, ChatId, Profile, TimeSource};

use super::state::CoreState;
use crate::reporting;

/// Command and event handlers for the engine task
pub struct CommandHandlers;

impl CommandHandlers {
    /// Handle first-interaction registration: upsert the profile and greet,
    /// unless the participant is banned.
    pub fn handle_register(state: &mut CoreState, id: ChatId, profile: Profile) -> Vec<Effect> {
        let name = profile.first_name.clone();
        state.roster.upsert(id, profile);

        if let Some(record) = state.bans.get(&id) {
            return vec![Effect::Notify {
                to: id,
                notice: Notice::Banned {
                    reason: record.reason.clone(),
                },
            }];
        }

        vec![Effect::Notify {
            to: id,
            notice: Notice::Welcome { name },
        }]
    }

    /// Handle a join request: gate, then either match against the oldest
    /// opposite waiter or start waiting with an armed search timer.
    pub fn handle_join(state: &mut CoreState, id: ChatId, category: Category) -> Vec<Effect> {
        if let Some(record) = state.bans.get(&id) {
            return vec![Effect::Notify {
                to: id,
                notice: Notice::Banned {
                    reason: record.reason.clone(),
                },
            }];
        }
        if state.pairs.contains(&id) {
            return vec![Effect::Notify {
                to: id,
                notice: Notice::AlreadyInChat,
            }];
        }
        if state.queues.contains(&id) {
            return vec![Effect::Notify {
                to: id,
                notice: Notice::AlreadySearching,
            }];
        }

        // FIFO: the oldest opposite waiter wins the match. Entries that are
        // banned or paired would violate the queue invariants; discard them
        // instead of matching.
        while let Some(candidate) = state.queues.pop_front(category.opposite()) {
            if state.bans.is_banned(&candidate) || state.pairs.contains(&candidate) {
                warn!(%candidate, "discarding invalid wait-queue entry");
                continue;
            }
            return Self::create_pair(state, id, candidate);
        }

        // Nobody waiting on the other side: wait and arm the timer.
        state.queues.enqueue(id, category);
        vec![
            Effect::ArmSearchTimer { id },
            Effect::Notify {
                to: id,
                notice: Notice::Searching,
            },
        ]
    }

    /// Establish a session between two participants. Both ends leave every
    /// queue and lose their timers before the link goes up, even if the
    /// caller already removed them.
    fn create_pair(state: &mut CoreState, a: ChatId, b: ChatId) -> Vec<Effect> {
        let mut effects = Vec::new();
        for id in [a, b] {
            state.queues.remove(&id);
            effects.push(Effect::CancelSearchTimer { id });
        }

        if !state.pairs.link(a, b) {
            warn!(%a, %b, "refusing to pair: one side already has a session");
            return effects;
        }
        state.stats.matches_made += 1;

        for id in [a, b] {
            effects.push(Effect::Notify {
                to: id,
                notice: Notice::Matched,
            });
        }
        effects
    }

    /// Route inbound text: command prefix → ban → blocklist → session, in
    /// that order. Returns the outcome classification alongside the effects.
    pub fn handle_text(
        state: &mut CoreState,
        id: ChatId,
        text: &str,
    ) -> (RouteOutcome, Vec<Effect>) {
        // Reserved commands and empty text are routed nowhere and emit
        // nothing; the transport handles its own command surface.
        if text.is_empty() || text.starts_with(COMMAND_PREFIX) {
            return (RouteOutcome::Ignored, Vec::new());
        }

        if let Some(record) = state.bans.get(&id) {
            return (
                RouteOutcome::Banned,
                vec![Effect::Notify {
                    to: id,
                    notice: Notice::Banned {
                        reason: record.reason.clone(),
                    },
                }],
            );
        }

        if state.blocklist.contains_blocked(text) {
            state.stats.messages_rejected += 1;
            return (
                RouteOutcome::Blocked,
                vec![Effect::Notify {
                    to: id,
                    notice: Notice::BlockedContent,
                }],
            );
        }

        match state.pairs.partner(&id) {
            Some(partner) => {
                state.stats.messages_delivered += 1;
                (
                    RouteOutcome::Delivered,
                    vec![Effect::Deliver {
                        to: partner,
                        text: text.to_string(),
                    }],
                )
            }
            None => (
                RouteOutcome::NoSession,
                vec![Effect::Notify {
                    to: id,
                    notice: Notice::NoSession,
                }],
            ),
        }
    }

    /// Tear down the participant's session, or clear stale queue membership
    /// when there is none.
    pub fn handle_end_chat(state: &mut CoreState, id: ChatId) -> Vec<Effect> {
        match state.pairs.unlink(&id) {
            Some(partner) => {
                let mut effects = Vec::new();
                for p in [id, partner] {
                    state.queues.remove(&p);
                    effects.push(Effect::CancelSearchTimer { id: p });
                }
                effects.push(Effect::Notify {
                    to: id,
                    notice: Notice::ChatEnded,
                });
                effects.push(Effect::Notify {
                    to: partner,
                    notice: Notice::PartnerLeft,
                });
                effects
            }
            None => {
                state.queues.remove(&id);
                vec![
                    Effect::CancelSearchTimer { id },
                    Effect::Notify {
                        to: id,
                        notice: Notice::NoActiveChat,
                    },
                ]
            }
        }
    }

    /// Stop an ongoing search. Always acknowledged, even when the
    /// participant was not actually waiting.
    pub fn handle_cancel_search(state: &mut CoreState, id: ChatId) -> Vec<Effect> {
        state.queues.remove(&id);
        vec![
            Effect::CancelSearchTimer { id },
            Effect::Notify {
                to: id,
                notice: Notice::SearchCancelled,
            },
        ]
    }

    /// A search timer fired. Only evict if the participant is still waiting:
    /// a late fire after a match or cancellation changes nothing.
    pub fn handle_search_timeout(state: &mut CoreState, id: ChatId) -> Vec<Effect> {
        if state.pairs.contains(&id) {
            // Already matched; the timer lost the race.
            return vec![Effect::CancelSearchTimer { id }];
        }
        if state.queues.remove(&id).is_none() {
            return vec![Effect::CancelSearchTimer { id }];
        }

        state.stats.searches_timed_out += 1;
        vec![
            Effect::CancelSearchTimer { id },
            Effect::Notify {
                to: id,
                notice: Notice::SearchTimedOut,
            },
        ]
    }

    /// Record a ban and force the target out of any session or queue.
    /// Unauthorized actors are silently ignored.
    pub fn handle_ban(
        state: &mut CoreState,
        actor: Actor,
        target: ChatId,
        reason: Option<String>,
    ) -> Vec<Effect> {
        if !actor.is_admin {
            return Vec::new();
        }

        state.bans.ban(target, reason.clone(), state.clock.now());

        let mut effects = Vec::new();
        if let Some(partner) = state.pairs.unlink(&target) {
            state.queues.remove(&partner);
            effects.push(Effect::CancelSearchTimer { id: partner });
            effects.push(Effect::Notify {
                to: partner,
                notice: Notice::PartnerLeft,
            });
        }
        state.queues.remove(&target);
        effects.push(Effect::CancelSearchTimer { id: target });
        effects.push(Effect::Notify {
            to: target,
            notice: Notice::Banned { reason },
        });
        effects.push(Effect::Notify {
            to: actor.id,
            notice: Notice::BanApplied { target },
        });
        effects
    }

    /// Lift a ban. A no-op on never-banned ids; the admin is acknowledged
    /// either way.
    pub fn handle_unban(state: &mut CoreState, actor: Actor, target: ChatId) -> Vec<Effect> {
        if !actor.is_admin {
            return Vec::new();
        }

        state.bans.unban(&target);
        vec![Effect::Notify {
            to: actor.id,
            notice: Notice::BanLifted { target },
        }]
    }

    /// Assemble the read-only operational report for an admin.
    pub fn handle_stats(state: &CoreState, actor: Actor) -> Vec<Effect> {
        if !actor.is_admin {
            return Vec::new();
        }

        vec![Effect::Notify {
            to: actor.id,
            notice: Notice::StatsReport(reporting::stats_report(state)),
        }]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
