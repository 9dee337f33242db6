//! Errores del secuenciador.
//!
//! El runner nunca captura ni sustituye un fallo: el error de un step se
//! envuelve en `FlowError::StepFailed` y se devuelve tal cual a quien haya
//! impulsado la ejecución (el cuerpo del caso o la llamada a `Proceed`).

use std::any::Any;

use thiserror::Error;

/// Error opaco producido por una acción de usuario.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("step {index} failed: {source}")]
    StepFailed {
        index: usize,
        #[source]
        source: StepError,
    },
    /// Un step entró en panic en el hilo que retomó el recorrido.
    #[error("step {index} panicked: {message}")]
    StepPanicked { index: usize, message: String },
    #[error("flow '{name}' already ran")]
    AlreadyRun { name: String },
}

impl FlowError {
    /// Índice del step que falló, si aplica.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            FlowError::StepFailed { index, .. } | FlowError::StepPanicked { index, .. } => Some(*index),
            FlowError::AlreadyRun { .. } => None,
        }
    }
}

/// Texto de un payload de panic (`&str` o `String`).
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failed_format_includes_index_and_source() {
        let err = FlowError::StepFailed { index: 3,
                                          source: "boom".into() };
        assert_eq!(err.to_string(), "step 3 failed: boom");
        assert_eq!(err.step_index(), Some(3));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn panic_message_reads_str_and_string() {
        assert_eq!(panic_message(&"a"), "a");
        assert_eq!(panic_message(&String::from("b")), "b");
        assert_eq!(panic_message(&3u8), "unknown panic");
        let err = FlowError::StepPanicked { index: 2,
                                            message: "a".into() };
        assert_eq!(err.to_string(), "step 2 panicked: a");
        assert_eq!(err.step_index(), Some(2));
    }

    #[test]
    fn already_run_format() {
        let err = FlowError::AlreadyRun { name: "login".into() };
        assert_eq!(err.to_string(), "flow 'login' already ran");
        assert_eq!(err.step_index(), None);
    }
}
