//! Tipos de evento del flujo y estructura `FlowEvent`.
//!
//! Rol en el flujo:
//! - El registro y cada recorrido de la secuencia emiten eventos a un
//!   `EventStore` append-only (si el flujo tiene uno asociado).
//! - Los eventos son sólo observación: el runner no los lee para decidir nada.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::step::EntryKind;

/// Motivo por el que un recorrido llegó al estado terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionReason {
    /// Se consumieron todas las entradas.
    EndOfSequence,
    /// Se encontró un marcador `Stop`.
    StopMarker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEventKind {
    /// El flujo registró su caso en el host. `anonymous_suite` indica que
    /// hubo que abrir una suite anónima para alojarlo.
    FlowRegistered { name: String, anonymous_suite: bool },
    /// El host invocó el caso y comienza el recorrido.
    RunStarted { step_count: usize },
    StepStarted { step_index: usize, kind: EntryKind },
    /// Un step síncrono retornó o un step asíncrono invocó su `Proceed`.
    StepFinished { step_index: usize },
    /// La acción devolvió error. No hay evento de cierre después de éste.
    StepFailed { step_index: usize, error: String },
    /// Posición vacía en la secuencia, saltada sin ejecutar nada.
    EntrySkipped { step_index: usize },
    StopReached { step_index: usize },
    /// Cierre: se emite exactamente una vez por recorrido exitoso.
    FlowCompleted { reason: CompletionReason },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub flow_id: Uuid,
    pub kind: FlowEventKind,
    pub ts: DateTime<Utc>, // metadato
}

/// Traza compacta de una lista de eventos, una letra por evento.
pub fn event_variants(events: &[FlowEvent]) -> Vec<&'static str> {
    events.iter()
          .map(|e| match e.kind {
              FlowEventKind::FlowRegistered { .. } => "R",
              FlowEventKind::RunStarted { .. } => "I",
              FlowEventKind::StepStarted { .. } => "S",
              FlowEventKind::StepFinished { .. } => "F",
              FlowEventKind::StepFailed { .. } => "X",
              FlowEventKind::EntrySkipped { .. } => "K",
              FlowEventKind::StopReached { .. } => "P",
              FlowEventKind::FlowCompleted { .. } => "C",
          })
          .collect()
}
