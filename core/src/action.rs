//! Actions: the only way game state changes.
//!
//! RULE: Hosts never poke registries directly during play.
//! Every mutation is an `Action` dispatched through the engine, so a
//! sequence of actions fully describes what happened to the state.
//!
//! Dispatch is synchronous and runs to completion. Flag hooks may
//! dispatch further actions from inside `perform`; the engine bounds
//! the nesting with `EngineConfig::max_dispatch_depth`.

use crate::{
    condition::Condition,
    config::UnregisteredButtonPolicy,
    engine::GameEngine,
    error::{GameError, GameResult},
    flag::FlagValue,
    message::{Message, Toast},
    queue::DelayedAction,
    types::{ButtonId, FlagId, ResourceId, Tick},
};

/// Every command the core understands.
/// Variants are appended over time, never removed or reordered.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Time and composition ──────────────────────
    /// Run `tick()` this many times, in order.
    PassTime { ticks: Tick },
    /// Perform each action in order, sharing state with no isolation.
    Bulk(Vec<Action>),
    /// Append a delayed action to the queue without running it.
    Enqueue(DelayedAction),
    /// Count down once; perform the wrapped action when the count hits zero.
    Delayed(DelayedAction),

    // ── Flags ─────────────────────────────────────
    SetFlag { flag: FlagId, value: FlagValue },
    ClearFlag { flag: FlagId },

    // ── Resources ─────────────────────────────────
    SetResourceValue { resource: ResourceId, amount: f64 },
    AddResourceValue { resource: ResourceId, delta: f64 },
    AddResourceDelta { resource: ResourceId, delta: f64 },

    // ── Messages and buttons ──────────────────────
    AddMessage { text: String, toast: Option<Toast> },
    EnableButton(ButtonId),
    DisableButton(ButtonId),

    // ── Conditions ────────────────────────────────
    AddCondition { condition: Condition, action: Box<Action> },
}

impl Action {
    pub fn pass_time(ticks: Tick) -> Self {
        Action::PassTime { ticks }
    }

    pub fn bulk(actions: impl IntoIterator<Item = Action>) -> Self {
        Action::Bulk(actions.into_iter().collect())
    }

    /// An action that fires `action` after `delay` ticks once enqueued.
    pub fn enqueue(action: Action, delay: Tick) -> Self {
        Action::Enqueue(DelayedAction::new(action, delay))
    }

    pub fn delayed(action: Action, delay: Tick) -> Self {
        Action::Delayed(DelayedAction::new(action, delay))
    }

    pub fn set_resource(resource: ResourceId, amount: f64) -> Self {
        Action::SetResourceValue { resource, amount }
    }

    pub fn add_resource(resource: ResourceId, delta: f64) -> Self {
        Action::AddResourceValue { resource, delta }
    }

    pub fn add_resource_delta(resource: ResourceId, delta: f64) -> Self {
        Action::AddResourceDelta { resource, delta }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Action::AddMessage { text: text.into(), toast: None }
    }

    pub fn message_with_toast(text: impl Into<String>, toast: Toast) -> Self {
        Action::AddMessage { text: text.into(), toast: Some(toast) }
    }

    pub fn add_condition(condition: Condition, action: Action) -> Self {
        Action::AddCondition { condition, action: Box::new(action) }
    }

    /// Turn a button's action list into a single dispatchable action.
    ///
    /// No actions means "wait one tick"; a single action runs as is;
    /// several run together as one bulk action.
    pub fn from_list(mut actions: Vec<Action>) -> Self {
        match actions.len() {
            0 => Action::pass_time(1),
            1 => actions.remove(0),
            _ => Action::Bulk(actions),
        }
    }

    /// Stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PassTime { .. }         => "pass_time",
            Action::Bulk(_)                 => "bulk",
            Action::Enqueue(_)              => "enqueue",
            Action::Delayed(_)              => "delayed",
            Action::SetFlag { .. }          => "set_flag",
            Action::ClearFlag { .. }        => "clear_flag",
            Action::SetResourceValue { .. } => "set_resource_value",
            Action::AddResourceValue { .. } => "add_resource_value",
            Action::AddResourceDelta { .. } => "add_resource_delta",
            Action::AddMessage { .. }       => "add_message",
            Action::EnableButton(_)         => "enable_button",
            Action::DisableButton(_)        => "disable_button",
            Action::AddCondition { .. }     => "add_condition",
        }
    }

    /// Apply this action to the engine's state.
    ///
    /// Takes `&mut self` because a `Delayed` action keeps its countdown
    /// in place between calls.
    pub fn perform(&mut self, engine: &mut GameEngine) -> GameResult<()> {
        engine.enter_dispatch()?;
        log::trace!("tick={} perform {}", engine.state.time(), self.kind());
        let result = self.apply(engine);
        engine.leave_dispatch();
        result
    }

    fn apply(&mut self, engine: &mut GameEngine) -> GameResult<()> {
        match self {
            Action::PassTime { ticks } => {
                for _ in 0..*ticks {
                    engine.tick()?;
                }
                Ok(())
            }

            Action::Bulk(actions) => {
                for action in actions.iter_mut() {
                    action.perform(engine)?;
                }
                Ok(())
            }

            Action::Enqueue(delayed) => {
                engine.state.queue.push(delayed.clone());
                Ok(())
            }

            Action::Delayed(delayed) => delayed.perform(engine).map(|_| ()),

            Action::SetFlag { flag, value } => {
                engine.state.flags.set(*flag, value.clone())?;
                let on_set = engine.state.flags.on_set_hook(*flag)?;
                on_set(engine, &*value)
            }

            Action::ClearFlag { flag } => {
                engine.state.flags.delete(*flag)?;
                let on_clear = engine.state.flags.on_clear_hook(*flag)?;
                on_clear(engine)
            }

            Action::SetResourceValue { resource, amount } => {
                set_resource_value(engine, *resource, *amount)
            }

            Action::AddResourceValue { resource, delta } => {
                register_on_change(engine, *resource, *delta)?;
                engine.state.resources.get_mut(*resource)?.amount += *delta;
                Ok(())
            }

            Action::AddResourceDelta { resource, delta } => {
                register_on_change(engine, *resource, *delta)?;
                engine.state.resources.get_mut(*resource)?.delta += *delta;
                Ok(())
            }

            Action::AddMessage { text, toast } => {
                let time = engine.state.time();
                engine
                    .state
                    .messages
                    .push(Message::new(text.clone(), time, toast.clone()));
                Ok(())
            }

            Action::EnableButton(button) => engine.state.buttons.enable(*button),

            Action::DisableButton(button) => {
                let policy = engine.config.unregistered_button;
                let buttons = &mut engine.state.buttons;
                if !buttons.is_active(*button) {
                    // Surface the handle error before consulting the policy.
                    buttons.get(*button)?;
                    match policy {
                        UnregisteredButtonPolicy::Reject => {
                            return Err(GameError::NotRegistered { button: *button });
                        }
                        UnregisteredButtonPolicy::Ignore => {
                            log::warn!("disabling {button} which was never enabled");
                        }
                    }
                }
                buttons.disable(*button)
            }

            Action::AddCondition { condition, action } => {
                engine
                    .state
                    .conditions
                    .push(condition.clone(), (**action).clone());
                Ok(())
            }
        }
    }
}

fn set_resource_value(engine: &mut GameEngine, resource: ResourceId, amount: f64) -> GameResult<()> {
    engine.state.resources.get_mut(resource)?.amount = amount;
    engine.state.resources.activate(resource)?;
    Ok(())
}

/// A nonzero change to an untracked resource registers it at its
/// current amount first. A zero change never registers.
fn register_on_change(engine: &mut GameEngine, resource: ResourceId, delta: f64) -> GameResult<()> {
    let current = engine.state.resources.get(resource)?.amount;
    if delta != 0.0 && !engine.state.resources.is_active(resource) {
        set_resource_value(engine, resource, current)?;
    }
    Ok(())
}
