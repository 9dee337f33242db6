//! Demo: registra algunos flujos en el host en memoria, los ejecuta y
//! muestra los reportes y el diario de eventos.
use std::sync::PoisonError;
use std::time::Duration;

use seqflow_rust::config::CONFIG;
use seqflow_rust::errors::CoreError;
use seqflow_rust::{ensure_passed, event_variants, flow, run_cases, EventStore, FlowHandle, InMemoryEventStore,
                   InMemoryTestHost, Proceed, SharedEventStore, TestRegistrar};

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    println!("Configuración: {:?}", *CONFIG);

    let runtime = tokio::runtime::Handle::current();
    let store = InMemoryEventStore::shared();
    let journal: SharedEventStore = store.clone();
    let mut host = InMemoryTestHost::new();

    // Flujo fuera de suite: se abre una suite anónima.
    flow(&mut host, "saludo", |f| {
        f.log("inicio").step(|| println!("  hola")).info("fin");
    });

    host.register_suite("carrito",
                        Box::new(|r: &mut dyn TestRegistrar| {
                            let login = journaled_flow(r, "login con espera", journal.clone(), |f| {
                                f.step_named("abre sesión", || println!("  sesión abierta"))
                                 .step_async_named("espera token", move |p: Proceed| {
                                     runtime.spawn(async move {
                                                tokio::time::sleep(Duration::from_millis(25)).await;
                                                if let Err(e) = p.proceed() {
                                                    log::error!("{}", CoreError::from(e));
                                                }
                                            });
                                 })
                                 .check(|| println!("  verificación"))
                                 .stop()
                                 .step(|| println!("  nunca se imprime"));
                            });
                            println!("Flujo '{}' con {} entradas", login.name(), login.len());

                            flow(r, "pasos deshabilitados", |f| {
                                f.xstep(|| println!("  deshabilitado"))
                                 .macro_steps(|m| {
                                     m.log("macro: paso 1").log("macro: paso 2");
                                 })
                                 .xaver(|| println!("  también deshabilitado"));
                            });
                        }));

    println!("Casos registrados: {:?}", host.case_names());

    // El host espera con Condvar; se ejecuta fuera de los workers de tokio.
    let reports = tokio::task::spawn_blocking(move || run_cases(&mut host)).await
                                                                         .map_err(|e| CoreError::Internal(e.to_string()))?;
    for report in &reports {
        println!("[{:?}] {} (señales: {})", report.status, report.name, report.completions);
    }

    let store = store.lock().unwrap_or_else(PoisonError::into_inner);
    for flow_id in store.flow_ids() {
        let events = store.list(flow_id);
        println!("Eventos {flow_id}: {:?}", event_variants(&events));
        for ev in &events {
            println!("  {}", serde_json::to_string(&ev.kind).unwrap_or_default());
        }
    }

    ensure_passed(&reports)
}

/// Igual que `flow` pero con un diario de eventos adjunto.
fn journaled_flow<F>(registrar: &mut dyn TestRegistrar, name: &str, journal: SharedEventStore, definition: F) -> FlowHandle
    where F: FnOnce(&FlowHandle)
{
    seqflow_core::flow(registrar, name, CONFIG.flow.options().with_journal(journal), definition)
}
