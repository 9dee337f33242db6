use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::StepOutcome;
use crate::engine::Proceed;
use crate::errors::StepError;

/// Acción síncrona ya normalizada.
pub type SyncAction = Box<dyn FnOnce() -> Result<(), StepError> + Send + 'static>;

/// Acción asíncrona ya normalizada: recibe la continuación `Proceed`.
pub type AsyncAction = Box<dyn FnOnce(Proceed) -> Result<(), StepError> + Send + 'static>;

/// Una unidad de trabajo dentro de la secuencia de un flujo.
pub enum StepEntry {
    Sync(SyncAction),
    Async(AsyncAction),
    Stop,
}

/// Discriminante de `StepEntry`, útil para inspección y eventos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Sync,
    Async,
    Stop,
}

impl StepEntry {
    /// Envuelve una acción síncrona.
    pub fn sync<F, R>(action: F) -> Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        StepEntry::Sync(Box::new(move || action().into_result()))
    }

    /// Envuelve una acción asíncrona que recibirá un `Proceed`.
    pub fn asynchronous<F, R>(action: F) -> Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        StepEntry::Async(Box::new(move |proceed| action(proceed).into_result()))
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            StepEntry::Sync(_) => EntryKind::Sync,
            StepEntry::Async(_) => EntryKind::Async,
            StepEntry::Stop => EntryKind::Stop,
        }
    }
}

impl fmt::Debug for StepEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StepEntry").field(&self.kind()).finish()
    }
}
