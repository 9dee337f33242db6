//! Runner: recorre la secuencia de entradas una sola vez.
//!
//! Estados: `Running(i)` mientras `i < len`, y `Completed`, alcanzado por fin
//! de secuencia o por un marcador `Stop`. Las entradas síncronas se ejecutan
//! en el mismo bucle; una entrada asíncrona entrega un `Proceed` y el bucle
//! retorna. Invocar ese `Proceed` retoma el recorrido en `i + 1` desde el
//! hilo que lo invoque.
//!
//! Un error de una acción sale por el mismo camino que la llamada que la
//! ejecutó, y además se reporta al host por `Done::fail`; `Done` nunca se
//! señaliza como éxito. Un panic durante `Proceed::proceed` se reporta igual
//! antes de seguir desenrollando.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};
use uuid::Uuid;

use super::lock;
use crate::constants::LOG_TARGET;
use crate::errors::{panic_message, FlowError, StepError};
use crate::event::{CompletionReason, FlowEventKind, SharedEventStore};
use crate::host::Done;
use crate::step::{EntryKind, StepEntry};

/// Contenido de una posición al leerla.
enum Slot {
    End,
    Empty,
    Entry(StepEntry),
}

pub(crate) struct Walk {
    flow_id: Uuid,
    name: String,
    entries: Mutex<Vec<Option<StepEntry>>>,
    done: Mutex<Option<Done>>,
    journal: Option<SharedEventStore>,
    /// Último step iniciado.
    cursor: AtomicUsize,
}

impl Walk {
    pub(crate) fn new(flow_id: Uuid,
                      name: String,
                      entries: Vec<StepEntry>,
                      done: Done,
                      journal: Option<SharedEventStore>)
                      -> Arc<Self> {
        Arc::new(Self { flow_id,
                        name,
                        entries: Mutex::new(entries.into_iter().map(Some).collect()),
                        done: Mutex::new(Some(done)),
                        journal,
                        cursor: AtomicUsize::new(0) })
    }

    /// Inicia el recorrido en la posición 0.
    pub(crate) fn start(self: Arc<Self>) -> Result<(), FlowError> {
        let step_count = lock(&self.entries).len();
        debug!(target: LOG_TARGET, "flow '{}' started with {step_count} entries", self.name);
        self.record(FlowEventKind::RunStarted { step_count });
        self.resume(0)
    }

    fn record(&self, kind: FlowEventKind) {
        if let Some(journal) = &self.journal {
            lock(journal).append_kind(self.flow_id, kind);
        }
    }

    /// Extrae la entrada en `index`. Cada entrada se extrae a lo sumo una vez.
    fn take(&self, index: usize) -> Slot {
        let mut entries = lock(&self.entries);
        match entries.get_mut(index) {
            None => Slot::End,
            Some(slot) => slot.take().map_or(Slot::Empty, Slot::Entry),
        }
    }

    fn resume(self: Arc<Self>, mut cursor: usize) -> Result<(), FlowError> {
        loop {
            match self.take(cursor) {
                Slot::End => {
                    self.complete(CompletionReason::EndOfSequence);
                    return Ok(());
                }
                Slot::Empty => {
                    trace!(target: LOG_TARGET, "flow '{}' skipping empty entry {cursor}", self.name);
                    self.record(FlowEventKind::EntrySkipped { step_index: cursor });
                    cursor += 1;
                }
                Slot::Entry(StepEntry::Stop) => {
                    debug!(target: LOG_TARGET, "flow '{}' reached stop marker at {cursor}", self.name);
                    self.record(FlowEventKind::StopReached { step_index: cursor });
                    self.complete(CompletionReason::StopMarker);
                    return Ok(());
                }
                Slot::Entry(StepEntry::Sync(action)) => {
                    self.started(cursor, EntryKind::Sync);
                    action().map_err(|e| self.fail(cursor, e))?;
                    self.record(FlowEventKind::StepFinished { step_index: cursor });
                    cursor += 1;
                }
                Slot::Entry(StepEntry::Async(action)) => {
                    self.started(cursor, EntryKind::Async);
                    let proceed = Proceed { walk: Arc::clone(&self),
                                            index: cursor };
                    debug!(target: LOG_TARGET, "flow '{}' suspended at async step {cursor}", self.name);
                    // La continuación queda en manos de la acción.
                    return action(proceed).map_err(|e| self.fail(cursor, e));
                }
            }
        }
    }

    fn started(&self, index: usize, kind: EntryKind) {
        self.cursor.store(index, Ordering::SeqCst);
        trace!(target: LOG_TARGET, "flow '{}' step {index} ({kind:?})", self.name);
        self.record(FlowEventKind::StepStarted { step_index: index, kind });
    }

    fn fail(&self, index: usize, source: StepError) -> FlowError {
        warn!(target: LOG_TARGET, "flow '{}' step {index} failed: {source}", self.name);
        self.record(FlowEventKind::StepFailed { step_index: index,
                                                error: source.to_string() });
        self.report(FlowError::StepFailed { index, source })
    }

    /// Entrega el fallo al host (si `Done` sigue pendiente) y lo devuelve.
    fn report(&self, err: FlowError) -> FlowError {
        let pending = lock(&self.done).take();
        if let Some(done) = pending {
            done.fail(&err);
        }
        err
    }

    /// Reporta un panic ocurrido al retomar. Con `Proceed` anidados sólo el
    /// más interno lo registra; `Done` ya no está para los demás.
    fn panicked(&self, message: String) {
        let Some(done) = lock(&self.done).take() else {
            return;
        };
        let index = self.cursor.load(Ordering::SeqCst);
        warn!(target: LOG_TARGET, "flow '{}' step {index} panicked: {message}", self.name);
        self.record(FlowEventKind::StepFailed { step_index: index,
                                                error: message.clone() });
        done.fail(&FlowError::StepPanicked { index, message });
    }

    fn complete(&self, reason: CompletionReason) {
        let Some(done) = lock(&self.done).take() else {
            return;
        };
        debug!(target: LOG_TARGET, "flow '{}' completed ({reason:?})", self.name);
        self.record(FlowEventKind::FlowCompleted { reason });
        done.signal();
    }
}

/// Continuación de un step asíncrono.
///
/// Se consume al invocarla: el recorrido se retoma una sola vez. Si nunca se
/// invoca, el flujo no termina y el caso queda a merced del timeout del host.
pub struct Proceed {
    walk: Arc<Walk>,
    index: usize,
}

impl Proceed {
    /// Posición del step asíncrono que recibió esta continuación.
    pub fn step_index(&self) -> usize {
        self.index
    }

    /// Retoma el recorrido en la siguiente posición.
    ///
    /// Devuelve el error del primer step posterior que falle antes de la
    /// siguiente suspensión o del final; ese error también llega al host.
    /// Si un step posterior entra en panic, el host recibe
    /// `FlowError::StepPanicked` y el panic continúa en este hilo.
    pub fn proceed(self) -> Result<(), FlowError> {
        let Proceed { walk, index } = self;
        trace!(target: LOG_TARGET, "flow '{}' step {index} proceeded", walk.name);
        walk.record(FlowEventKind::StepFinished { step_index: index });
        let resumed = Arc::clone(&walk);
        match panic::catch_unwind(AssertUnwindSafe(move || resumed.resume(index + 1))) {
            Ok(result) => result,
            Err(payload) => {
                walk.panicked(panic_message(payload.as_ref()));
                panic::resume_unwind(payload)
            }
        }
    }
}

impl fmt::Debug for Proceed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed")
         .field("flow", &self.walk.name)
         .field("index", &self.index)
         .finish()
    }
}
