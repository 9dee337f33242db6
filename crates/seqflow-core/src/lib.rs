//! seqflow-core: secuenciador declarativo de steps de test.
//!
//! Un flujo acumula entradas (`step`, `check`, `stop`, `log`, ...) mediante un
//! builder fluido, registra un único caso en el framework anfitrión y, cuando
//! éste lo invoca, recorre las entradas en orden exactamente una vez:
//! - las síncronas se ejecutan y el recorrido sigue de inmediato;
//! - las asíncronas reciben un `Proceed` y el recorrido espera a que se invoque;
//! - un `Stop` termina el recorrido con éxito.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod flow;
pub mod host;
pub mod output;
pub mod step;

pub use engine::{FlowHandle, FlowOptions, Proceed};
pub use errors::{panic_message, FlowError, StepError};
pub use event::{event_variants, CompletionReason, EventStore, FlowEvent, FlowEventKind, InMemoryEventStore,
                SharedEventStore};
pub use flow::{flow, register_flow};
pub use host::{CaseBody, Done, SuiteBody, TestRegistrar};
pub use output::{PrintLevel, Printer, RecordingPrinter, StdoutPrinter};
pub use step::{EntryKind, StepEntry, StepOutcome};
