//! Entradas de la secuencia de steps.
//!
//! Una `StepEntry` es una de tres variantes explícitas:
//! - `Sync`: acción sin argumentos, se ejecuta y el runner continúa de
//!   inmediato.
//! - `Async`: acción que recibe un `Proceed`; el runner se suspende hasta que
//!   alguien lo invoque.
//! - `Stop`: marcador que termina la secuencia con éxito.

mod definition;
mod outcome;

pub use definition::{AsyncAction, EntryKind, StepEntry, SyncAction};
pub use outcome::StepOutcome;
