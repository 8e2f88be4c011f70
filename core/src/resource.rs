//! Resource registry.
//!
//! RULE: A resource is "active" (player visible) only after it has been
//! produced once. Definitions exist from the start so arithmetic can
//! target a resource before it is ever shown.
//!
//! `delta` accumulates additively and is never reset here; per-tick
//! accrual from `delta` into `amount` is up to content rules.

use crate::{
    error::{GameError, GameResult},
    types::ResourceId,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub name:   String,
    pub amount: f64,
    pub delta:  f64,
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    defs:   Vec<Resource>,
    active: Vec<ResourceId>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a resource with a starting amount. It is not active yet.
    pub fn define(&mut self, name: impl Into<String>, amount: f64) -> ResourceId {
        let id = ResourceId::from_index(self.defs.len());
        self.defs.push(Resource { name: name.into(), amount, delta: 0.0 });
        id
    }

    pub fn get(&self, id: ResourceId) -> GameResult<&Resource> {
        self.defs.get(id.index()).ok_or(GameError::UnknownResource(id))
    }

    pub fn get_mut(&mut self, id: ResourceId) -> GameResult<&mut Resource> {
        self.defs.get_mut(id.index()).ok_or(GameError::UnknownResource(id))
    }

    pub fn find(&self, name: &str) -> Option<ResourceId> {
        self.defs
            .iter()
            .position(|r| r.name == name)
            .map(ResourceId::from_index)
    }

    pub fn is_active(&self, id: ResourceId) -> bool {
        self.active.contains(&id)
    }

    /// Append `id` to the active list unless already there.
    /// Returns true when newly activated.
    pub fn activate(&mut self, id: ResourceId) -> GameResult<bool> {
        self.get(id)?;
        if self.is_active(id) {
            return Ok(false);
        }
        log::debug!("activated {id} ({})", self.defs[id.index()].name);
        self.active.push(id);
        Ok(true)
    }

    /// Active resources in activation order.
    pub fn active(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.active.iter().map(|&id| (id, &self.defs[id.index()]))
    }

    pub fn active_ids(&self) -> &[ResourceId] {
        &self.active
    }
}
