use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use super::{FlowEvent, FlowEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> FlowEvent;
    /// Lista eventos de un flujo (orden ascendente por seq).
    fn list(&self, flow_id: Uuid) -> Vec<FlowEvent>;
}

/// Store compartido entre el builder, el runner y las continuaciones
/// `Proceed`, que pueden vivir en otros hilos.
pub type SharedEventStore = Arc<Mutex<dyn EventStore + Send>>;

/// Diario en memoria: un vector de eventos por flujo, en orden de registro.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    journals: HashMap<Uuid, Vec<FlowEvent>>,
    /// Flujos en el orden en que registraron su primer evento.
    order: Vec<Uuid>,
}

impl InMemoryEventStore {
    /// Crea un store vacío listo para compartir.
    pub fn shared() -> Arc<Mutex<InMemoryEventStore>> {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Ids de flujos con al menos un evento, en orden de aparición.
    pub fn flow_ids(&self) -> Vec<Uuid> {
        self.order.clone()
    }

    /// Eventos de un flujo sin copiarlos.
    pub fn events(&self, flow_id: Uuid) -> &[FlowEvent] {
        self.journals.get(&flow_id).map_or(&[], Vec::as_slice)
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> FlowEvent {
        if !self.journals.contains_key(&flow_id) {
            self.order.push(flow_id);
        }
        let journal = self.journals.entry(flow_id).or_default();
        let event = FlowEvent { seq: journal.len() as u64,
                                flow_id,
                                kind,
                                ts: Utc::now() };
        journal.push(event.clone());
        event
    }

    fn list(&self, flow_id: Uuid) -> Vec<FlowEvent> {
        self.events(flow_id).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::event_variants;

    #[test]
    fn append_assigns_sequential_seq_per_flow() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let e0 = store.append_kind(a, FlowEventKind::RunStarted { step_count: 2 });
        let e1 = store.append_kind(a, FlowEventKind::StepStarted { step_index: 0,
                                                                   kind: crate::step::EntryKind::Sync });
        let other = store.append_kind(b, FlowEventKind::RunStarted { step_count: 0 });
        assert_eq!((e0.seq, e1.seq, other.seq), (0, 1, 0));
        assert_eq!(event_variants(&store.list(a)), vec!["I", "S"]);
        assert!(store.list(Uuid::new_v4()).is_empty());
        assert_eq!(store.flow_ids(), vec![a, b]);
        assert_eq!(store.events(b).len(), 1);
    }

    #[test]
    fn events_serialize_to_json() {
        let mut store = InMemoryEventStore::default();
        let id = Uuid::new_v4();
        let ev = store.append_kind(id, FlowEventKind::FlowCompleted { reason: crate::event::CompletionReason::StopMarker });
        let json = serde_json::to_value(&ev).expect("serializable");
        assert_eq!(json["kind"]["FlowCompleted"]["reason"], "StopMarker");
        let back: FlowEvent = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back.kind, ev.kind);
    }
}
