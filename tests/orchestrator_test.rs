// tests/orchestrator_test.rs — Integration test: orchestrator with fake runners

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use powjob::core::orchestrator::Orchestrator;
use powjob::core::registry::JobRegistry;
use powjob::core::types::{Challenge, PowOutcome, PowResult};
use powjob::runner::{ProcessRunner, RunRequest, ToolSettings};

#[derive(Clone, Copy)]
enum Behavior {
    Succeed(&'static str),
    Fail,
    /// Sleep `delay`, bounded by the configured timeout like a real runner.
    Sleep(Duration),
    Panic,
    /// Sleep a random 1..=20ms, then succeed.
    RandomDelay,
}

/// What the runner observed when it was called.
#[derive(Debug, Clone)]
struct Observation {
    run_id: String,
    registered: bool,
    in_flight: usize,
    session: String,
    timeout: Duration,
}

/// A runner that never starts a process; it checks the registry and then
/// does whatever `behavior` says.
struct FakeRunner {
    registry: JobRegistry,
    behavior: Behavior,
    seen: Arc<Mutex<Vec<Observation>>>,
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, request: RunRequest) -> PowResult {
        let started = request.started;
        let run_id = request.challenge.run_id.clone();
        self.seen.lock().unwrap().push(Observation {
            run_id: run_id.clone(),
            registered: self.registry.contains(&run_id),
            in_flight: self.registry.len(),
            session: request.session.to_string(),
            timeout: request.settings.timeout,
        });

        match self.behavior {
            Behavior::Succeed(password) => PowResult::found(password, started.elapsed().as_secs_f64()),
            Behavior::Fail => PowResult::failed(
                format!("{run_id}: hashcat execution failed with code 1 (exhausted): "),
                started.elapsed().as_secs_f64(),
            ),
            Behavior::Sleep(delay) => {
                let slept = tokio::time::timeout(request.settings.timeout, tokio::time::sleep(delay)).await;
                let elapsed = started.elapsed().as_secs_f64();
                match slept {
                    Ok(()) => PowResult::found("late", elapsed),
                    Err(_) => PowResult::failed(
                        format!("{run_id}: hashcat execution timed out ({elapsed:.2})"),
                        elapsed,
                    ),
                }
            }
            Behavior::Panic => panic!("simulated runner failure for {run_id}"),
            Behavior::RandomDelay => {
                tokio::time::sleep(random_delay()).await;
                PowResult::found(run_id, started.elapsed().as_secs_f64())
            }
        }
    }
}

fn random_delay() -> Duration {
    let mut buf = [0u8; 1];
    getrandom::getrandom(&mut buf).unwrap();
    Duration::from_millis(1 + u64::from(buf[0] % 20))
}

fn settings(timeout: Duration) -> ToolSettings {
    ToolSettings {
        timeout,
        ..ToolSettings::default()
    }
}

fn orchestrator(behavior: Behavior, timeout: Duration) -> (Orchestrator<FakeRunner>, Arc<Mutex<Vec<Observation>>>) {
    let registry = JobRegistry::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner {
        registry: registry.clone(),
        behavior,
        seen: seen.clone(),
    };
    (
        Orchestrator::with_registry(runner, settings(timeout), registry),
        seen,
    )
}

fn challenge(run_id: &str) -> Challenge {
    Challenge::new(run_id, "ab12cd", "s4lt", "610", "abcdef0123", "?1?1?1?1")
}

#[tokio::test]
async fn test_registered_during_success_and_removed_after() {
    let (orch, seen) = orchestrator(Behavior::Succeed("secret123"), Duration::from_secs(5));

    let result = orch.dispatch(challenge("job-ok")).await;

    assert_eq!(result.password.as_deref(), Some("secret123"));
    assert_eq!(result.error, None);
    let seen = seen.lock().unwrap();
    assert!(seen[0].registered);
    assert_eq!(seen[0].in_flight, 1);
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_removed_after_tool_failure() {
    let (orch, seen) = orchestrator(Behavior::Fail, Duration::from_secs(5));

    let result = orch.dispatch(challenge("job-fail")).await;

    assert_eq!(result.outcome(), PowOutcome::Failed);
    assert!(result.error.unwrap().contains("code 1"));
    assert!(seen.lock().unwrap()[0].registered);
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_removed_after_timeout() {
    let timeout = Duration::from_millis(200);
    let (orch, seen) = orchestrator(Behavior::Sleep(Duration::from_secs(30)), timeout);

    let started = Instant::now();
    let result = orch.dispatch(challenge("job-slow")).await;

    assert!(started.elapsed() < timeout + Duration::from_secs(2));
    assert_eq!(result.password, None);
    assert!(result.error.unwrap().contains("timed out"));
    assert!(result.local_execution_time >= 0.15);
    assert_eq!(seen.lock().unwrap()[0].timeout, timeout);
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_runner_panic_becomes_failure_and_deregisters() {
    let (orch, seen) = orchestrator(Behavior::Panic, Duration::from_secs(5));

    let result = orch.dispatch(challenge("job-panic")).await;

    assert_eq!(result.password, None);
    let error = result.error.unwrap();
    assert!(error.starts_with("job-panic: "));
    assert!(error.contains("simulated runner failure"));
    assert!(result.local_execution_time >= 0.0);
    assert!(seen.lock().unwrap()[0].registered);
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_cancelled_dispatch_deregisters() {
    let (orch, _seen) = orchestrator(Behavior::Sleep(Duration::from_secs(30)), Duration::from_secs(60));

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), orch.dispatch(challenge("job-dropped"))).await;

    assert!(cancelled.is_err());
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_session_token_fresh_per_dispatch() {
    let (orch, seen) = orchestrator(Behavior::Succeed("pw"), Duration::from_secs(5));

    orch.dispatch(challenge("a")).await;
    orch.dispatch(challenge("a")).await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0].session, seen[1].session);
    for obs in seen.iter() {
        assert_eq!(obs.session.len(), 32);
        assert_eq!(obs.run_id, "a");
    }
}

#[tokio::test]
async fn test_dispatch_all_preserves_order_and_empties_registry() {
    let (orch, seen) = orchestrator(Behavior::RandomDelay, Duration::from_secs(5));
    let challenges: Vec<_> = (0..50).map(|i| challenge(&format!("batch-{i}"))).collect();

    let results = orch.dispatch_all(challenges).await;

    assert_eq!(results.len(), 50);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.password.as_deref(), Some(format!("batch-{i}").as_str()));
    }
    let seen = seen.lock().unwrap();
    assert!(seen.iter().all(|o| o.registered));
    assert!(seen.iter().map(|o| o.in_flight).max().unwrap() > 1);
    assert!(orch.registry().is_empty());
    assert!(orch.running_jobs().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_spawned_dispatches_leave_no_entries() {
    let (orch, seen) = orchestrator(Behavior::RandomDelay, Duration::from_secs(5));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let orch = orch.clone();
            tokio::spawn(async move { orch.dispatch(challenge(&format!("par-{i}"))).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_success());
    }
    assert_eq!(seen.lock().unwrap().len(), 64);
    assert!(orch.registry().is_empty());
}

#[tokio::test]
async fn test_running_jobs_visible_while_in_flight() {
    let (orch, _seen) = orchestrator(Behavior::Sleep(Duration::from_millis(300)), Duration::from_secs(5));

    let worker = orch.clone();
    let handle = tokio::spawn(async move { worker.dispatch(challenge("watch-me")).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(orch.running_jobs(), vec!["watch-me".to_string()]);

    let result = handle.await.unwrap();
    assert_eq!(result.password.as_deref(), Some("late"));
    assert!(orch.running_jobs().is_empty());
}
