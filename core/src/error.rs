use crate::types::{ButtonId, FlagId, ResourceId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown resource {0}")]
    UnknownResource(ResourceId),

    #[error("Unknown button {0}")]
    UnknownButton(ButtonId),

    #[error("Unknown flag {0}")]
    UnknownFlag(FlagId),

    #[error("Button {button} was never enabled")]
    NotRegistered { button: ButtonId },

    #[error("Button {button} is not available to press")]
    ButtonUnavailable { button: ButtonId },

    #[error("Button {button} already has its actions bound")]
    ActionsAlreadyBound { button: ButtonId },

    #[error("Flag '{flag}' expects a value of type {expected}")]
    FlagTypeMismatch { flag: String, expected: &'static str },

    #[error("Dispatch depth limit of {limit} exceeded")]
    DispatchDepthExceeded { limit: usize },

    #[error("Invalid time factor: {0}")]
    InvalidTimeFactor(f64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
