use std::sync::{Arc, Mutex};
use std::time::Duration;

use seqflow_rust::{ensure_passed, event_variants, flow, run_cases, CaseStatus, EventStore, FlowOptions,
                   InMemoryEventStore, InMemoryTestHost, Proceed, SharedEventStore};

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn tag(trace: &Trace, name: &'static str) -> impl FnOnce() + Send + 'static {
    let trace = Arc::clone(trace);
    move || {
        trace.lock().unwrap().push(name);
    }
}

#[test]
fn configured_flow_runs_checks_by_default() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    let handle = flow(&mut host, "checks", |f| {
        f.step(tag(&trace, "step")).check(tag(&trace, "check")).aver(tag(&trace, "aver"));
    });
    assert!(handle.checks_enabled());
    let reports = run_cases(&mut host);
    ensure_passed(&reports).expect("all cases pass");
    assert_eq!(*trace.lock().unwrap(), vec!["step", "check", "aver"]);
}

#[test]
fn reusable_macro_keeps_position() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    let login = {
        let trace = Arc::clone(&trace);
        move |f: &seqflow_rust::FlowHandle| {
            f.step(tag(&trace, "usuario")).step(tag(&trace, "clave"));
        }
    };
    flow(&mut host, "macro", |f| {
        f.step(tag(&trace, "abrir")).macro_steps(login).step(tag(&trace, "comprar"));
    });
    ensure_passed(&run_cases(&mut host)).expect("case passes");
    assert_eq!(*trace.lock().unwrap(), vec!["abrir", "usuario", "clave", "comprar"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_step_driven_by_tokio_timer() {
    let runtime = tokio::runtime::Handle::current();
    let store = InMemoryEventStore::shared();
    let journal: SharedEventStore = store.clone();
    let trace: Trace = Arc::default();
    let mut host = InMemoryTestHost::new();

    let t = Arc::clone(&trace);
    let handle = seqflow_core::flow(&mut host, "tokio", FlowOptions::default().with_journal(journal), |f| {
        f.step(tag(&trace, "antes"))
         .step_async(move |p: Proceed| {
             runtime.spawn(async move {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        t.lock().unwrap().push("timer");
                        p.proceed().expect("rest of flow passes");
                    });
         })
         .step(tag(&trace, "después"));
    });

    let reports = tokio::task::spawn_blocking(move || host.run_all_with_timeout(Duration::from_secs(5))).await
                                                                                                     .expect("host thread");
    assert_eq!(reports[0].status, CaseStatus::Passed);
    assert_eq!(*trace.lock().unwrap(), vec!["antes", "timer", "después"]);

    let events = store.lock().unwrap().list(handle.id());
    assert_eq!(event_variants(&events), vec!["R", "I", "S", "F", "S", "F", "S", "F", "C"]);
}

#[test]
fn stop_then_more_steps_still_passes() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    flow(&mut host, "stop", |f| {
        f.step(tag(&trace, "a")).stop().step::<_, ()>(|| panic!("after stop"));
    });
    let reports = run_cases(&mut host);
    assert!(reports[0].passed());
    assert_eq!(reports[0].completions, 1);
    assert_eq!(*trace.lock().unwrap(), vec!["a"]);
}
