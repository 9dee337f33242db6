use seqflow_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de flujo: {0}")]
    Flow(#[from] FlowError),
    #[error("{failed} de {total} casos no pasaron")]
    CasesFailed { failed: usize, total: usize },
}
