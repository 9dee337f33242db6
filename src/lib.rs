//! SeqFlow Rust Library
//!
//! Este crate actúa como la librería central de SeqFlow:
//! - Expone `config` con los valores por defecto leídos del entorno.
//! - Expone `errors` para los errores de aplicación.
//! - Re-exporta el secuenciador (`seqflow-core`) y el host en memoria
//!   (`seqflow-host`), y ofrece `flow`/`run_cases` con la configuración global.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod errors;

pub use seqflow_core::{event_variants, register_flow, CompletionReason, Done, EntryKind, EventStore, FlowError,
                       FlowEvent, FlowEventKind, FlowHandle, FlowOptions, InMemoryEventStore, PrintLevel, Printer,
                       Proceed, RecordingPrinter, SharedEventStore, StdoutPrinter, StepError, TestRegistrar};
pub use seqflow_host::{CaseReport, CaseStatus, InMemoryTestHost};

use config::CONFIG;
use errors::CoreError;

/// Crea y registra un flujo con las opciones configuradas en `CONFIG`.
pub fn flow<F>(registrar: &mut dyn TestRegistrar, name: &str, definition: F) -> FlowHandle
    where F: FnOnce(&FlowHandle)
{
    seqflow_core::flow(registrar, name, CONFIG.flow.options(), definition)
}

/// Ejecuta los casos pendientes del host con el timeout configurado.
pub fn run_cases(host: &mut InMemoryTestHost) -> Vec<CaseReport> {
    host.run_all_with_timeout(CONFIG.flow.case_timeout)
}

/// Convierte una lista de reportes en error si algún caso no pasó.
pub fn ensure_passed(reports: &[CaseReport]) -> Result<(), CoreError> {
    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(CoreError::CasesFailed { failed,
                                     total: reports.len() })
    }
}
