//! Typed flags with install/remove hooks.
//!
//! A `Flag<T>` is a copyable handle carrying its value type. The store
//! keeps values type-erased and checks the type on every install, so
//! a flag never holds a value of the wrong type.
//!
//! Every flag has both hooks. SetFlag and ClearFlag always call them;
//! use `FlagHooks::noop()` for a flag without side effects.

use crate::{
    action::Action,
    engine::GameEngine,
    error::{GameError, GameResult},
    types::FlagId,
};
use serde::Serialize;
use std::{
    any::{Any, TypeId},
    fmt,
    marker::PhantomData,
    rc::Rc,
};

/// Anything that can be stored under a flag.
pub trait FlagData: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn to_json(&self) -> serde_json::Value;
}

impl<T> FlagData for T
where
    T: Any + fmt::Debug + Serialize,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            log::warn!("flag value {self:?} does not serialize: {e}");
            serde_json::Value::Null
        })
    }
}

/// A type-erased flag value. Cheap to clone.
#[derive(Clone)]
pub struct FlagValue(Rc<dyn FlagData>);

impl FlagValue {
    pub fn new<T: FlagData>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.0.to_json()
    }

    fn value_type(&self) -> TypeId {
        self.0.as_any().type_id()
    }
}

impl fmt::Debug for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

pub type SetHook   = Rc<dyn Fn(&mut GameEngine, &FlagValue) -> GameResult<()>>;
pub type ClearHook = Rc<dyn Fn(&mut GameEngine) -> GameResult<()>>;

/// Side effects run after a flag's value is installed or removed.
pub struct FlagHooks<T> {
    on_set:   Box<dyn Fn(&mut GameEngine, &T) -> GameResult<()>>,
    on_clear: Box<dyn Fn(&mut GameEngine) -> GameResult<()>>,
}

impl<T: FlagData> FlagHooks<T> {
    pub fn new(
        on_set:   impl Fn(&mut GameEngine, &T) -> GameResult<()> + 'static,
        on_clear: impl Fn(&mut GameEngine) -> GameResult<()> + 'static,
    ) -> Self {
        Self {
            on_set:   Box::new(on_set),
            on_clear: Box::new(on_clear),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_, _| Ok(()), |_| Ok(()))
    }
}

/// Typed handle to a flag.
pub struct Flag<T> {
    id:      FlagId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Flag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Flag<T> {}

impl<T> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flag({})", self.id)
    }
}

impl<T> PartialEq for Flag<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Flag<T> {}

impl<T: FlagData> Flag<T> {
    pub fn id(&self) -> FlagId {
        self.id
    }

    /// SetFlag action for this flag.
    pub fn set(&self, value: T) -> Action {
        Action::SetFlag { flag: self.id, value: FlagValue::new(value) }
    }

    /// ClearFlag action for this flag.
    pub fn clear(&self) -> Action {
        Action::ClearFlag { flag: self.id }
    }
}

struct FlagEntry {
    name:       String,
    value_type: TypeId,
    type_name:  &'static str,
    value:      Option<FlagValue>,
    on_set:     SetHook,
    on_clear:   ClearHook,
}

#[derive(Default)]
pub struct FlagStore {
    entries: Vec<FlagEntry>,
}

impl fmt::Debug for FlagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.name, &e.value)))
            .finish()
    }
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new flag with its hooks. The flag starts unset.
    pub fn define<T: FlagData>(&mut self, name: impl Into<String>, hooks: FlagHooks<T>) -> Flag<T> {
        let name = name.into();
        let id = FlagId::from_index(self.entries.len());

        let typed_set = hooks.on_set;
        let hook_name = name.clone();
        let on_set: SetHook = Rc::new(move |engine: &mut GameEngine, value: &FlagValue| {
            let typed = value.downcast_ref::<T>().ok_or_else(|| GameError::FlagTypeMismatch {
                flag:     hook_name.clone(),
                expected: std::any::type_name::<T>(),
            })?;
            typed_set(engine, typed)
        });
        let on_clear: ClearHook = Rc::from(hooks.on_clear);

        self.entries.push(FlagEntry {
            name,
            value_type: TypeId::of::<T>(),
            type_name:  std::any::type_name::<T>(),
            value:      None,
            on_set,
            on_clear,
        });
        Flag { id, _marker: PhantomData }
    }

    fn entry(&self, flag: FlagId) -> GameResult<&FlagEntry> {
        self.entries.get(flag.index()).ok_or(GameError::UnknownFlag(flag))
    }

    fn entry_mut(&mut self, flag: FlagId) -> GameResult<&mut FlagEntry> {
        self.entries.get_mut(flag.index()).ok_or(GameError::UnknownFlag(flag))
    }

    /// Typed read. `None` when the flag is unset.
    pub fn get<T: 'static>(&self, flag: &Flag<T>) -> Option<&T> {
        self.entries
            .get(flag.id.index())
            .and_then(|e| e.value.as_ref())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_value(&self, flag: FlagId) -> GameResult<Option<&FlagValue>> {
        Ok(self.entry(flag)?.value.as_ref())
    }

    pub fn is_set(&self, flag: FlagId) -> bool {
        self.entries
            .get(flag.index())
            .is_some_and(|e| e.value.is_some())
    }

    /// Install `value`, replacing any previous value. Does not run hooks.
    pub fn set(&mut self, flag: FlagId, value: FlagValue) -> GameResult<()> {
        let entry = self.entry_mut(flag)?;
        if value.value_type() != entry.value_type {
            return Err(GameError::FlagTypeMismatch {
                flag:     entry.name.clone(),
                expected: entry.type_name,
            });
        }
        entry.value = Some(value);
        Ok(())
    }

    /// Remove the value, if any. Does not run hooks.
    pub fn delete(&mut self, flag: FlagId) -> GameResult<Option<FlagValue>> {
        Ok(self.entry_mut(flag)?.value.take())
    }

    pub(crate) fn on_set_hook(&self, flag: FlagId) -> GameResult<SetHook> {
        Ok(Rc::clone(&self.entry(flag)?.on_set))
    }

    pub(crate) fn on_clear_hook(&self, flag: FlagId) -> GameResult<ClearHook> {
        Ok(Rc::clone(&self.entry(flag)?.on_clear))
    }

    /// Set flags in definition order. Names need not be unique.
    pub fn iter_set(&self) -> impl Iterator<Item = (FlagId, &str, &FlagValue)> {
        self.entries.iter().enumerate().filter_map(|(index, e)| {
            e.value
                .as_ref()
                .map(|v| (FlagId::from_index(index), e.name.as_str(), v))
        })
    }
}
