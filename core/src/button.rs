//! Button registry.
//!
//! A button's action list is bound exactly once; after that only its
//! visibility changes. Once enabled, a button stays in the active list
//! for good so its UI position is stable across hide/show cycles.

use crate::{
    action::Action,
    error::{GameError, GameResult},
    types::ButtonId,
};

#[derive(Debug, Clone)]
pub struct Button {
    label:   String,
    visible: bool,
    actions: Option<Vec<Action>>,
}

impl Button {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Bound actions. Empty until bound.
    pub fn actions(&self) -> &[Action] {
        self.actions.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Default)]
pub struct ButtonRegistry {
    defs:   Vec<Button>,
    active: Vec<ButtonId>,
}

impl ButtonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a handle for a button whose actions are bound later.
    /// Lets two buttons refer to each other.
    pub fn declare(&mut self, label: impl Into<String>) -> ButtonId {
        let id = ButtonId::from_index(self.defs.len());
        self.defs.push(Button { label: label.into(), visible: false, actions: None });
        id
    }

    pub fn bind(&mut self, id: ButtonId, actions: Vec<Action>) -> GameResult<()> {
        let button = self.get_mut(id)?;
        if button.actions.is_some() {
            return Err(GameError::ActionsAlreadyBound { button: id });
        }
        button.actions = Some(actions);
        Ok(())
    }

    pub fn define(&mut self, label: impl Into<String>, actions: Vec<Action>) -> ButtonId {
        let id = self.declare(label);
        self.defs[id.index()].actions = Some(actions);
        id
    }

    pub fn get(&self, id: ButtonId) -> GameResult<&Button> {
        self.defs.get(id.index()).ok_or(GameError::UnknownButton(id))
    }

    fn get_mut(&mut self, id: ButtonId) -> GameResult<&mut Button> {
        self.defs.get_mut(id.index()).ok_or(GameError::UnknownButton(id))
    }

    pub fn find(&self, label: &str) -> Option<ButtonId> {
        self.defs
            .iter()
            .position(|b| b.label == label)
            .map(ButtonId::from_index)
    }

    pub fn is_active(&self, id: ButtonId) -> bool {
        self.active.contains(&id)
    }

    /// Add to the active list if absent, then make visible.
    pub fn enable(&mut self, id: ButtonId) -> GameResult<()> {
        self.get_mut(id)?.visible = true;
        if !self.is_active(id) {
            self.active.push(id);
        }
        Ok(())
    }

    /// Hide the button. It keeps its place in the active list.
    pub fn disable(&mut self, id: ButtonId) -> GameResult<()> {
        self.get_mut(id)?.visible = false;
        Ok(())
    }

    /// Active buttons in enable order, visible or not.
    pub fn active(&self) -> impl Iterator<Item = (ButtonId, &Button)> {
        self.active.iter().map(|&id| (id, &self.defs[id.index()]))
    }

    pub fn active_ids(&self) -> &[ButtonId] {
        &self.active
    }
}
