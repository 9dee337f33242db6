use std::fmt;
use std::sync::Arc;

use crate::constants::DEFAULT_CHECK_ENABLED;
use crate::event::SharedEventStore;
use crate::output::{Printer, StdoutPrinter};

/// Opciones de construcción de un flujo.
#[derive(Clone)]
pub struct FlowOptions {
    /// Valor inicial del flag que decide si `check`/`aver` agregan entradas.
    pub check_enabled: bool,
    /// Destino de los steps `log`/`info`.
    pub printer: Arc<dyn Printer>,
    /// Diario de eventos opcional.
    pub journal: Option<SharedEventStore>,
}

impl FlowOptions {
    pub fn with_check_enabled(mut self, enabled: bool) -> Self {
        self.check_enabled = enabled;
        self
    }

    pub fn with_printer(mut self, printer: Arc<dyn Printer>) -> Self {
        self.printer = printer;
        self
    }

    pub fn with_journal(mut self, journal: SharedEventStore) -> Self {
        self.journal = Some(journal);
        self
    }
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self { check_enabled: DEFAULT_CHECK_ENABLED,
               printer: Arc::new(StdoutPrinter),
               journal: None }
    }
}

impl fmt::Debug for FlowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowOptions")
         .field("check_enabled", &self.check_enabled)
         .field("journal", &self.journal.is_some())
         .finish_non_exhaustive()
    }
}
