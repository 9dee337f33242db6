use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use seqflow_core::{flow, FlowOptions, Proceed, RecordingPrinter, TestRegistrar};
use seqflow_host::{CaseStatus, InMemoryTestHost};

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn tag(trace: &Trace, name: &'static str) -> impl FnOnce() + Send + 'static {
    let trace = Arc::clone(trace);
    move || {
        trace.lock().unwrap().push(name);
    }
}

#[test]
fn flow_outside_suite_gets_anonymous_suite() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    flow(&mut host, "t", FlowOptions::default(), |f| {
        f.step(tag(&trace, "a")).step(tag(&trace, "b"));
    });
    assert_eq!(host.case_names(), vec![" > t"]);

    let reports = host.run_all();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].passed());
    assert_eq!(reports[0].completions, 1);
    assert_eq!(*trace.lock().unwrap(), vec!["a", "b"]);
}

#[test]
fn flows_inside_a_suite_share_it() {
    let mut host = InMemoryTestHost::new();
    host.register_suite("checkout",
                        Box::new(|r: &mut dyn TestRegistrar| {
                            flow(r, "uno", FlowOptions::default(), |f| {
                                f.step(|| {});
                            });
                            flow(r, "dos", FlowOptions::default(), |f| {
                                f.stop();
                            });
                        }));
    assert_eq!(host.case_names(), vec!["checkout > uno", "checkout > dos"]);
    assert!(host.run_all().iter().all(|r| r.passed()));
}

#[test]
fn failing_step_fails_the_case() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    flow(&mut host, "falla", FlowOptions::default(), |f| {
        f.step(tag(&trace, "a"))
         .step(|| -> Result<(), String> { Err("saldo incorrecto".into()) })
         .step(tag(&trace, "c"));
    });
    let reports = host.run_all();
    assert_eq!(reports[0].status, CaseStatus::Failed("step 1 failed: saldo incorrecto".into()));
    assert_eq!(reports[0].completions, 0);
    assert_eq!(*trace.lock().unwrap(), vec!["a"]);
}

#[test]
fn panicking_step_is_caught_by_host() {
    let mut host = InMemoryTestHost::new();
    flow(&mut host, "panic", FlowOptions::default(), |f| {
        f.step(|| assert_eq!(1 + 1, 3, "aritmética"));
    });
    let reports = host.run_all();
    assert!(matches!(reports[0].status, CaseStatus::Panicked(ref m) if m.contains("aritmética")));
}

#[test]
fn async_step_completes_from_another_thread() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    let t = Arc::clone(&trace);
    flow(&mut host, "async", FlowOptions::default(), |f| {
        f.step_async(move |p: Proceed| {
             thread::spawn(move || {
                 thread::sleep(Duration::from_millis(10));
                 t.lock().unwrap().push("timer");
                 p.proceed().expect("rest passes");
             });
         })
         .step(tag(&trace, "c"));
    });
    let reports = host.run_all();
    assert!(reports[0].passed(), "{:?}", reports[0]);
    assert_eq!(*trace.lock().unwrap(), vec!["timer", "c"]);
}

#[test]
fn failure_after_async_resume_fails_the_case() {
    let mut host = InMemoryTestHost::new();
    let trace: Trace = Arc::default();
    let t = Arc::clone(&trace);
    flow(&mut host, "tarde", FlowOptions::default(), |f| {
        f.step_async(move |p: Proceed| {
             thread::spawn(move || {
                 thread::sleep(Duration::from_millis(10));
                 t.lock().unwrap().push("timer");
                 let err = p.proceed().unwrap_err();
                 assert_eq!(err.step_index(), Some(1));
             });
         })
         .step(|| -> Result<(), String> { Err("saldo incorrecto".into()) })
         .step(tag(&trace, "c"));
    });
    let started = Instant::now();
    let reports = host.run_all_with_timeout(Duration::from_secs(5));
    assert_eq!(reports[0].status, CaseStatus::Failed("step 1 failed: saldo incorrecto".into()));
    assert_eq!(reports[0].completions, 0);
    assert!(started.elapsed() < Duration::from_secs(2), "waited for the timeout");
    assert_eq!(*trace.lock().unwrap(), vec!["timer"]);
}

#[test]
fn panic_after_async_resume_fails_the_case() {
    let mut host = InMemoryTestHost::new();
    flow(&mut host, "panic tarde", FlowOptions::default(), |f| {
        f.step_async(|p: Proceed| {
             thread::spawn(move || {
                 thread::sleep(Duration::from_millis(10));
                 let _ = p.proceed();
             });
         })
         .step(|| assert_eq!(1 + 1, 3, "aritmética"));
    });
    let started = Instant::now();
    let reports = host.run_all_with_timeout(Duration::from_secs(5));
    assert!(matches!(reports[0].status,
                     CaseStatus::Failed(ref m) if m.starts_with("step 1 panicked") && m.contains("aritmética")),
            "{:?}",
            reports[0]);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn never_proceeding_flow_times_out() {
    let mut host = InMemoryTestHost::new();
    flow(&mut host, "colgado", FlowOptions::default(), |f| {
        f.step_async(|_p: Proceed| {}).step::<_, ()>(|| panic!("unreachable"));
    });
    let reports = host.run_all_with_timeout(Duration::from_millis(30));
    assert_eq!(reports[0].status, CaseStatus::TimedOut);
}

#[test]
fn checks_disabled_by_options() {
    let mut host = InMemoryTestHost::new();
    let printer = Arc::new(RecordingPrinter::new());
    let handle = flow(&mut host,
                      "sin checks",
                      FlowOptions::default().with_check_enabled(false).with_printer(printer.clone()),
                      |f| {
                          f.check_named::<_, ()>("verifica", || panic!("disabled check ran")).log("fin");
                      });
    assert_eq!(handle.len(), 1);
    assert!(host.run_all()[0].passed());
    assert_eq!(printer.messages(), vec!["fin".to_string()]);
}
