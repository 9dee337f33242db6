//! Host de tests en memoria para `seqflow-core`.
//!
//! Implementa `TestRegistrar` con suites anidadas y casos registrados, y
//! ejecuta los casos como lo haría un framework anfitrión:
//! - cada caso recibe un `Done`; el caso pasa cuando se señaliza;
//! - un error devuelto o un panic hacen fallar el caso;
//! - un fallo reportado por `Done::fail` (p. ej. un step posterior a un
//!   `Proceed` invocado desde otro hilo) también hace fallar el caso;
//! - si no llega ni la señal ni un fallo dentro del timeout, el caso queda
//!   `TimedOut`.
//!
//! La señal puede llegar desde otro hilo (steps asíncronos), por eso la
//! espera usa `Mutex` + `Condvar`.

mod report;

pub use report::{CaseReport, CaseStatus};

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, warn};
use seqflow_core::{panic_message, CaseBody, Done, FlowError, SuiteBody, TestRegistrar};

/// Timeout por defecto para casos que quedan esperando su `Done`.
pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(5);

const LOG_TARGET: &str = "seqflow::host";

struct RegisteredCase {
    suite_path: Vec<String>,
    name: String,
    body: Option<CaseBody>,
}

#[derive(Default)]
struct Outcome {
    signals: usize,
    failure: Option<String>,
}

/// Señales `Done` y fallo reportado por un caso.
#[derive(Default)]
struct Completion {
    outcome: Mutex<Outcome>,
    cond: Condvar,
}

impl Completion {
    fn lock(&self) -> std::sync::MutexGuard<'_, Outcome> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn signal(&self) {
        self.lock().signals += 1;
        self.cond.notify_all();
    }

    /// Guarda el primer fallo reportado.
    fn fail(&self, err: &FlowError) {
        self.lock().failure.get_or_insert_with(|| err.to_string());
        self.cond.notify_all();
    }

    fn count(&self) -> usize {
        self.lock().signals
    }

    /// Espera una señal o un fallo. `None` si vence el plazo; si no,
    /// `Some(fallo)` con `None` dentro cuando el caso terminó bien.
    fn wait(&self, timeout: Duration) -> Option<Option<String>> {
        let deadline = Instant::now() + timeout;
        let mut outcome = self.lock();
        while outcome.signals == 0 && outcome.failure.is_none() {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            outcome = self.cond
                          .wait_timeout(outcome, deadline - now)
                          .unwrap_or_else(PoisonError::into_inner)
                          .0;
        }
        Some(outcome.failure.clone())
    }
}

#[derive(Default)]
pub struct InMemoryTestHost {
    suite_stack: Vec<String>,
    suites: Vec<Vec<String>>,
    cases: Vec<RegisteredCase>,
}

impl InMemoryTestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rutas de todas las suites abiertas, en orden de apertura.
    pub fn suites(&self) -> &[Vec<String>] {
        &self.suites
    }

    /// Nombres completos de los casos registrados (`suite > ... > caso`).
    pub fn case_names(&self) -> Vec<String> {
        self.cases.iter().map(|c| full_name(&c.suite_path, &c.name)).collect()
    }

    pub fn pending_cases(&self) -> usize {
        self.cases.iter().filter(|c| c.body.is_some()).count()
    }

    /// Ejecuta los casos aún no ejecutados con el timeout por defecto.
    pub fn run_all(&mut self) -> Vec<CaseReport> {
        self.run_all_with_timeout(DEFAULT_CASE_TIMEOUT)
    }

    pub fn run_all_with_timeout(&mut self, timeout: Duration) -> Vec<CaseReport> {
        self.cases
            .iter_mut()
            .filter_map(|case| {
                let body = case.body.take()?;
                Some(run_case(full_name(&case.suite_path, &case.name), body, timeout))
            })
            .collect()
    }
}

impl TestRegistrar for InMemoryTestHost {
    fn in_suite(&self) -> bool {
        !self.suite_stack.is_empty()
    }

    fn register_suite(&mut self, name: &str, body: SuiteBody<'_>) {
        self.suite_stack.push(name.to_string());
        self.suites.push(self.suite_stack.clone());
        let registrar: &mut dyn TestRegistrar = self;
        body(registrar);
        self.suite_stack.pop();
    }

    fn register_case(&mut self, name: &str, body: CaseBody) {
        debug!(target: LOG_TARGET, "registered case '{}'", full_name(&self.suite_stack, name));
        self.cases.push(RegisteredCase { suite_path: self.suite_stack.clone(),
                                         name: name.to_string(),
                                         body: Some(body) });
    }
}

fn full_name(path: &[String], name: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join(" > ")
}

fn run_case(name: String, body: CaseBody, timeout: Duration) -> CaseReport {
    let completion = Arc::new(Completion::default());
    let ok = Arc::clone(&completion);
    let failed = Arc::clone(&completion);
    let done = Done::with_failure(move || ok.signal(), move |err: &FlowError| failed.fail(err));

    let status = match panic::catch_unwind(AssertUnwindSafe(move || body(done))) {
        Err(payload) => CaseStatus::Panicked(panic_message(payload.as_ref())),
        Ok(Err(err)) => CaseStatus::Failed(err.to_string()),
        Ok(Ok(())) => match completion.wait(timeout) {
            Some(None) => CaseStatus::Passed,
            Some(Some(msg)) => CaseStatus::Failed(msg),
            None => CaseStatus::TimedOut,
        },
    };
    match &status {
        CaseStatus::Passed => debug!(target: LOG_TARGET, "case '{name}' passed"),
        other => warn!(target: LOG_TARGET, "case '{name}' did not pass: {other:?}"),
    }
    CaseReport { name,
                 status,
                 completions: completion.count() }
}
