//! Readiness Prober
//!
//! Polls a diagnostic command until its output contains a success marker
//! or a deadline passes. The poller runs on its own thread; the caller only
//! ever blocks on the deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::ports::RemoteShell;

/// What to run and what to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessProbe {
    pub command: String,
    /// Substring of the command output that means "ready"
    pub success_marker: String,
    pub deadline: Duration,
    pub privileged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    Ready,
    TimedOut,
}

/// Runs probes against one shell at a fixed interval
pub struct ReadinessProber<S> {
    shell: Arc<S>,
    interval: Duration,
}

impl<S> ReadinessProber<S>
where
    S: RemoteShell + 'static,
{
    pub fn new(shell: Arc<S>, interval: Duration) -> Self {
        Self { shell, interval }
    }

    /// Block until `probe` succeeds on `host` or its deadline elapses
    ///
    /// Each poll sleeps first, then runs the command. Command failures are
    /// treated as "not ready yet". After a timeout the poller finishes its
    /// in-flight call and exits; its result is dropped.
    pub fn wait_for(&self, host: &str, probe: &ReadinessProbe) -> ReadinessOutcome {
        let (tx, rx) = mpsc::sync_channel::<()>(1);
        let abandoned = Arc::new(AtomicBool::new(false));

        let shell = Arc::clone(&self.shell);
        let flag = Arc::clone(&abandoned);
        let interval = self.interval;
        let host_owned = host.to_string();
        let probe_owned = probe.clone();

        let spawned = thread::Builder::new()
            .name("readiness-probe".to_string())
            .spawn(move || poll(shell.as_ref(), &host_owned, &probe_owned, interval, &flag, tx));

        if let Err(e) = spawned {
            tracing::error!(host, error = %e, "could not start readiness poller");
            return ReadinessOutcome::TimedOut;
        }

        let started = Instant::now();
        match rx.recv_timeout(probe.deadline) {
            Ok(()) => {
                tracing::info!(
                    host,
                    marker = %probe.success_marker,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "service ready"
                );
                ReadinessOutcome::Ready
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                abandoned.store(true, Ordering::SeqCst);
                ReadinessOutcome::TimedOut
            }
        }
    }
}

fn poll<S: RemoteShell + ?Sized>(
    shell: &S,
    host: &str,
    probe: &ReadinessProbe,
    interval: Duration,
    abandoned: &AtomicBool,
    ready: mpsc::SyncSender<()>,
) {
    let mut attempt = 0u32;
    loop {
        thread::sleep(interval);
        if abandoned.load(Ordering::SeqCst) {
            return;
        }
        attempt += 1;

        match shell.exec(host, &probe.command, probe.privileged) {
            Ok(output) if output.contains(&probe.success_marker) => {
                // Never blocks; a receiver that already gave up is fine
                let _ = ready.try_send(());
                return;
            }
            Ok(_) => tracing::debug!(host, attempt, "not ready yet"),
            Err(e) => tracing::warn!(host, attempt, error = %e, "readiness probe failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RemoteError;
    use std::sync::atomic::AtomicUsize;

    /// Returns the marker starting from the `ready_on`-th call
    struct Converging {
        calls: AtomicUsize,
        ready_on: usize,
        fail_before: bool,
    }

    impl Converging {
        fn new(ready_on: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                ready_on,
                fail_before: false,
            }
        }
    }

    impl RemoteShell for Converging {
        fn exec(
            &self,
            host: &str,
            _command: &str,
            _privileged: bool,
        ) -> Result<String, RemoteError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.ready_on {
                return Ok("agent: Synced node info".to_string());
            }
            if self.fail_before {
                return Err(RemoteError::Transport {
                    host: host.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok("agent: starting".to_string())
        }
    }

    fn probe(deadline: Duration) -> ReadinessProbe {
        ReadinessProbe {
            command: "docker service logs traefik_consul_server 2>&1".to_string(),
            success_marker: "Synced node info".to_string(),
            deadline,
            privileged: true,
        }
    }

    #[test]
    fn ready_when_marker_appears_before_deadline() {
        let shell = Arc::new(Converging::new(2));
        let prober = ReadinessProber::new(Arc::clone(&shell), Duration::from_millis(10));

        let outcome = prober.wait_for("10.0.0.1", &probe(Duration::from_secs(1)));

        assert_eq!(outcome, ReadinessOutcome::Ready);
        assert_eq!(shell.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn timed_out_when_deadline_covers_fewer_polls() {
        let shell = Arc::new(Converging::new(2));
        let prober = ReadinessProber::new(Arc::clone(&shell), Duration::from_millis(200));

        let outcome = prober.wait_for("10.0.0.1", &probe(Duration::from_millis(250)));

        assert_eq!(outcome, ReadinessOutcome::TimedOut);
    }

    #[test]
    fn probe_errors_count_as_not_ready() {
        let shell = Arc::new(Converging {
            fail_before: true,
            ..Converging::new(3)
        });
        let prober = ReadinessProber::new(Arc::clone(&shell), Duration::from_millis(10));

        let outcome = prober.wait_for("10.0.0.1", &probe(Duration::from_secs(2)));

        assert_eq!(outcome, ReadinessOutcome::Ready);
        assert_eq!(shell.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn abandoned_poller_stops_calling() {
        let shell = Arc::new(Converging::new(usize::MAX));
        let prober = ReadinessProber::new(Arc::clone(&shell), Duration::from_millis(20));

        let outcome = prober.wait_for("10.0.0.1", &probe(Duration::from_millis(70)));
        assert_eq!(outcome, ReadinessOutcome::TimedOut);

        thread::sleep(Duration::from_millis(100));
        let settled = shell.calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(shell.calls.load(Ordering::SeqCst), settled);
    }
}
