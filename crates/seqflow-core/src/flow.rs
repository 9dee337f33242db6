//! Punto de entrada: crea un flujo y registra su caso en el host.

use log::debug;

use crate::constants::{ANONYMOUS_SUITE, LOG_TARGET};
use crate::engine::{FlowHandle, FlowOptions};
use crate::event::FlowEventKind;
use crate::host::TestRegistrar;

/// Crea un flujo, registra su caso y ejecuta `definition` para poblarlo.
///
/// El registro ocurre antes de la definición; el recorrido ocurre más tarde,
/// cuando el host invoque el caso.
pub fn flow<F>(registrar: &mut dyn TestRegistrar, name: &str, options: FlowOptions, definition: F) -> FlowHandle
    where F: FnOnce(&FlowHandle)
{
    let handle = register_flow(registrar, name, options);
    definition(&handle);
    handle
}

/// Variante sin definición: las entradas se agregan luego sobre el handle.
pub fn register_flow(registrar: &mut dyn TestRegistrar, name: &str, options: FlowOptions) -> FlowHandle {
    let handle = FlowHandle::new(name, options);
    let body = handle.case_body();
    let anonymous_suite = !registrar.in_suite();
    if anonymous_suite {
        let case_name = name.to_string();
        registrar.register_suite(ANONYMOUS_SUITE, Box::new(move |r: &mut dyn TestRegistrar| r.register_case(&case_name, body)));
    } else {
        registrar.register_case(name, body);
    }
    debug!(target: LOG_TARGET, "registered flow '{name}' (anonymous suite: {anonymous_suite})");
    handle.record(FlowEventKind::FlowRegistered { name: name.to_string(),
                                                  anonymous_suite });
    handle
}
