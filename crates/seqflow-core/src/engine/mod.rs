//! Motor del secuenciador: builder fluido (`FlowHandle`), opciones y el
//! runner que recorre la secuencia (`Walk` + `Proceed`).

pub mod builder;
pub mod core;
pub mod options;

pub use builder::FlowHandle;
pub use self::core::Proceed;
pub use options::FlowOptions;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bloquea ignorando el envenenamiento: un panic dentro de una acción no debe
/// dejar inservible el estado del flujo para el host que lo reporta.
pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
