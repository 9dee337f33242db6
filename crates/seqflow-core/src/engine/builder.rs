//! Builder fluido de un flujo.
//!
//! `FlowHandle` es un handle compartido (`Arc`) sobre el estado del flujo:
//! el caso registrado en el host guarda un clon, y la definición del usuario
//! recibe `&FlowHandle` para encadenar llamadas. Todas las operaciones
//! devuelven `&Self`.
//!
//! Notas
//! - Las entradas se agregan en orden y no se modifican después.
//! - `check`/`aver` consultan `check_enabled` en el momento de la llamada;
//!   cambiar el flag después no afecta entradas ya agregadas.
//! - Las variantes `x*` aceptan la misma firma y no hacen nada.
//!
//! ```ignore
//! flow(&mut host, "login", FlowOptions::default(), |f| {
//!     f.step_named("abre sesión", || open())
//!      .step_async(|p| later(move || p.proceed()))
//!      .check(|| assert!(logged_in()))
//!      .stop();
//! });
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use log::debug;
use uuid::Uuid;

use super::core::Walk;
use super::lock;
use super::options::FlowOptions;
use super::Proceed;
use crate::constants::LOG_TARGET;
use crate::errors::FlowError;
use crate::event::{FlowEventKind, SharedEventStore};
use crate::host::{CaseBody, Done};
use crate::output::{PrintLevel, Printer};
use crate::step::{EntryKind, StepEntry, StepOutcome};

struct FlowState {
    entries: Vec<StepEntry>,
    check_enabled: bool,
    ran: bool,
}

struct FlowInner {
    id: Uuid,
    name: String,
    printer: Arc<dyn Printer>,
    journal: Option<SharedEventStore>,
    state: Mutex<FlowState>,
}

/// Handle de un flujo: acumula entradas y las ejecuta una sola vez.
#[derive(Clone)]
pub struct FlowHandle {
    inner: Arc<FlowInner>,
}

impl FlowHandle {
    pub fn new(name: &str, options: FlowOptions) -> Self {
        let FlowOptions { check_enabled,
                          printer,
                          journal } = options;
        Self { inner: Arc::new(FlowInner { id: Uuid::new_v4(),
                                           name: name.to_string(),
                                           printer,
                                           journal,
                                           state: Mutex::new(FlowState { entries: Vec::new(),
                                                                         check_enabled,
                                                                         ran: false }) }) }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Cantidad de entradas acumuladas (incluye marcadores y logs).
    pub fn len(&self) -> usize {
        lock(&self.inner.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tipos de las entradas en orden de agregado.
    pub fn entry_kinds(&self) -> Vec<EntryKind> {
        lock(&self.inner.state).entries.iter().map(StepEntry::kind).collect()
    }

    pub fn checks_enabled(&self) -> bool {
        lock(&self.inner.state).check_enabled
    }

    /// Cambia el flag para los `check`/`aver` siguientes.
    pub fn set_check_enabled(&self, enabled: bool) -> &Self {
        lock(&self.inner.state).check_enabled = enabled;
        self
    }

    pub(crate) fn record(&self, kind: FlowEventKind) {
        if let Some(journal) = &self.inner.journal {
            lock(journal).append_kind(self.inner.id, kind);
        }
    }

    fn push(&self, entry: StepEntry) -> &Self {
        lock(&self.inner.state).entries.push(entry);
        self
    }

    fn push_labeled(&self, label: &str, entry: StepEntry) -> &Self {
        self.log(label).push(entry)
    }

    fn push_checked(&self, label: Option<&str>, entry: StepEntry) -> &Self {
        if !self.checks_enabled() {
            return self;
        }
        match label {
            Some(label) => self.push_labeled(label, entry),
            None => self.push(entry),
        }
    }

    fn print_entry(&self, level: PrintLevel, message: &str) -> StepEntry {
        let printer = Arc::clone(&self.inner.printer);
        let message = message.to_string();
        StepEntry::sync(move || printer.print(level, &message))
    }

    // ----- step -----

    pub fn step<F, R>(&self, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.push(StepEntry::sync(action))
    }

    /// Agrega un step precedido por un log con `name`.
    pub fn step_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_labeled(name, StepEntry::sync(action))
    }

    pub fn step_async<F, R>(&self, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.push(StepEntry::asynchronous(action))
    }

    pub fn step_async_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_labeled(name, StepEntry::asynchronous(action))
    }

    pub fn xstep<A>(&self, _action: A) -> &Self {
        self
    }

    pub fn xstep_named<A>(&self, _name: &str, _action: A) -> &Self {
        self
    }

    // ----- check / aver -----

    /// Como `step`, pero sólo agrega si `check_enabled` es `true`.
    pub fn check<F, R>(&self, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_checked(None, StepEntry::sync(action))
    }

    pub fn check_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_checked(Some(name), StepEntry::sync(action))
    }

    pub fn check_async<F, R>(&self, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_checked(None, StepEntry::asynchronous(action))
    }

    pub fn check_async_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.push_checked(Some(name), StepEntry::asynchronous(action))
    }

    pub fn xcheck<A>(&self, _action: A) -> &Self {
        self
    }

    pub fn xcheck_named<A>(&self, _name: &str, _action: A) -> &Self {
        self
    }

    /// Alias de `check`.
    pub fn aver<F, R>(&self, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.check(action)
    }

    pub fn aver_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce() -> R + Send + 'static,
              R: StepOutcome
    {
        self.check_named(name, action)
    }

    pub fn aver_async<F, R>(&self, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.check_async(action)
    }

    pub fn aver_async_named<F, R>(&self, name: &str, action: F) -> &Self
        where F: FnOnce(Proceed) -> R + Send + 'static,
              R: StepOutcome
    {
        self.check_async_named(name, action)
    }

    pub fn xaver<A>(&self, _action: A) -> &Self {
        self
    }

    pub fn xaver_named<A>(&self, _name: &str, _action: A) -> &Self {
        self
    }

    // ----- composición, marcadores y logs -----

    /// Ejecuta `compose` ahora mismo con este handle, para que agregue un
    /// grupo reutilizable de entradas en la posición actual.
    pub fn macro_steps<F>(&self, compose: F) -> &Self
        where F: FnOnce(&FlowHandle)
    {
        compose(self);
        self
    }

    pub fn xmacro_steps<F>(&self, _compose: F) -> &Self
        where F: FnOnce(&FlowHandle)
    {
        self
    }

    /// Agrega un marcador de fin: las entradas posteriores nunca se visitan.
    pub fn stop(&self) -> &Self {
        self.push(StepEntry::Stop)
    }

    pub fn log(&self, message: &str) -> &Self {
        self.push(self.print_entry(PrintLevel::Log, message))
    }

    pub fn info(&self, message: &str) -> &Self {
        self.push(self.print_entry(PrintLevel::Info, message))
    }

    // ----- ejecución -----

    /// Recorre la secuencia una sola vez y señaliza `done` al terminar.
    ///
    /// Una segunda llamada devuelve `FlowError::AlreadyRun`.
    pub fn run(&self, done: Done) -> Result<(), FlowError> {
        let entries = {
            let mut state = lock(&self.inner.state);
            if state.ran {
                return Err(FlowError::AlreadyRun { name: self.inner.name.clone() });
            }
            state.ran = true;
            std::mem::take(&mut state.entries)
        };
        debug!(target: LOG_TARGET, "running flow '{}' ({})", self.inner.name, self.inner.id);
        Walk::new(self.inner.id,
                  self.inner.name.clone(),
                  entries,
                  done,
                  self.inner.journal.clone()).start()
    }

    /// Cuerpo de caso que el host invocará para ejecutar este flujo.
    pub fn case_body(&self) -> CaseBody {
        let handle = self.clone();
        Box::new(move |done| handle.run(done))
    }
}

impl fmt::Debug for FlowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowHandle")
         .field("id", &self.inner.id)
         .field("name", &self.inner.name)
         .field("entries", &self.entry_kinds())
         .finish()
    }
}
