//! Interfaz mínima hacia el framework de tests anfitrión.
//!
//! El secuenciador no sabe nada del framework concreto: sólo necesita saber
//! si hay una suite activa, poder abrir una y registrar un caso con nombre
//! cuyo cuerpo recibe una señal de finalización (`Done`).

use std::fmt;

use crate::errors::FlowError;

/// Señal de finalización de un caso. Se consume al usarla, así que un caso
/// no puede señalizar dos veces a través del mismo `Done`.
///
/// Además del éxito (`signal`), lleva un canal de fallo opcional (`fail`):
/// el runner lo usa cuando un step falla, para que el host se entere aunque
/// el fallo ocurra en el hilo que invocó un `Proceed` y no en el cuerpo del
/// caso.
pub struct Done {
    on_done: Box<dyn FnOnce() + Send + 'static>,
    on_fail: Option<Box<dyn FnOnce(&FlowError) + Send + 'static>>,
}

impl Done {
    pub fn new<F>(on_done: F) -> Self
        where F: FnOnce() + Send + 'static
    {
        Done { on_done: Box::new(on_done),
               on_fail: None }
    }

    /// Señal con un callback para el fallo del caso.
    pub fn with_failure<F, G>(on_done: F, on_fail: G) -> Self
        where F: FnOnce() + Send + 'static,
              G: FnOnce(&FlowError) + Send + 'static
    {
        Done { on_done: Box::new(on_done),
               on_fail: Some(Box::new(on_fail)) }
    }

    /// Señal que no hace nada (útil para ejecutar un flujo fuera de un host).
    pub fn noop() -> Self {
        Done::new(|| {})
    }

    pub fn signal(self) {
        (self.on_done)()
    }

    /// Reporta el fallo del caso. Sin callback de fallo no hace nada; el
    /// error igual vuelve a quien impulsó el step.
    pub fn fail(self, error: &FlowError) {
        if let Some(on_fail) = self.on_fail {
            on_fail(error);
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Done")
    }
}

/// Cuerpo de un caso registrado.
pub type CaseBody = Box<dyn FnOnce(Done) -> Result<(), FlowError> + Send + 'static>;

/// Cuerpo de una suite; se ejecuta de forma síncrona al registrarla.
pub type SuiteBody<'a> = Box<dyn FnOnce(&mut dyn TestRegistrar) + 'a>;

/// Capacidad de registro del framework anfitrión.
pub trait TestRegistrar {
    /// `true` si hay una suite abierta en este momento.
    fn in_suite(&self) -> bool;

    /// Abre una suite, ejecuta `body` dentro de ella y la cierra.
    fn register_suite(&mut self, name: &str, body: SuiteBody<'_>);

    /// Registra un caso en la suite activa.
    fn register_case(&mut self, name: &str, body: CaseBody);
}
