//! The mutable game state every action works on.

use crate::{
    button::ButtonRegistry,
    clock::GameClock,
    condition::ConditionRegistry,
    flag::FlagStore,
    message::MessageLog,
    queue::ActionQueue,
    resource::ResourceRegistry,
    types::Tick,
};

#[derive(Debug, Default)]
pub struct GameState {
    pub clock:      GameClock,
    pub resources:  ResourceRegistry,
    pub buttons:    ButtonRegistry,
    pub flags:      FlagStore,
    pub messages:   MessageLog,
    pub queue:      ActionQueue,
    pub conditions: ConditionRegistry,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> Tick {
        self.clock.time
    }
}
