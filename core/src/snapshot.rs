//! Snapshot: a serializable read model of the game state.
//!
//! Hosts render from snapshots and never hold references into the
//! live state. A snapshot is a view only: there is no way to rebuild
//! a `GameState` from one.

use crate::{
    message::Message,
    state::GameState,
    types::{ButtonId, FlagId, ResourceId, Tick},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceView {
    pub id:     ResourceId,
    pub name:   String,
    pub amount: f64,
    pub delta:  f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ButtonView {
    pub id:      ButtonId,
    pub label:   String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlagView {
    pub id:    FlagId,
    pub name:  String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameSnapshot {
    pub time:               Tick,
    pub paused:             bool,
    pub time_factor:        f64,
    pub resources:          Vec<ResourceView>,
    pub buttons:            Vec<ButtonView>,
    /// Set flags only, in definition order.
    pub flags:              Vec<FlagView>,
    /// Newest first, truncated to the display limit.
    pub messages:           Vec<Message>,
    pub queued_actions:     usize,
    pub pending_conditions: usize,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, message_limit: usize) -> Self {
        Self {
            time:        state.time(),
            paused:      state.clock.paused,
            time_factor: state.clock.time_factor(),
            resources: state
                .resources
                .active()
                .map(|(id, r)| ResourceView {
                    id,
                    name:   r.name.clone(),
                    amount: r.amount,
                    delta:  r.delta,
                })
                .collect(),
            buttons: state
                .buttons
                .active()
                .map(|(id, b)| ButtonView {
                    id,
                    label:   b.label().to_string(),
                    visible: b.visible(),
                })
                .collect(),
            flags: state
                .flags
                .iter_set()
                .map(|(id, name, value)| FlagView {
                    id,
                    name:  name.to_string(),
                    value: value.to_json(),
                })
                .collect(),
            messages:           state.messages.recent(message_limit).cloned().collect(),
            queued_actions:     state.queue.len(),
            pending_conditions: state.conditions.len(),
        }
    }

    /// Value of the first set flag called `name`.
    pub fn flag(&self, name: &str) -> Option<&serde_json::Value> {
        self.flags.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Buttons the UI should draw.
    pub fn visible_buttons(&self) -> impl Iterator<Item = &ButtonView> {
        self.buttons.iter().filter(|b| b.visible)
    }
}
