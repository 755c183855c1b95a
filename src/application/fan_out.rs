//! Fan-Out Executor
//!
//! Runs the same remote operation on every node at once and collects every
//! outcome. One scoped thread per node; cluster sizes are small enough that
//! no concurrency limit is applied.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use crate::domain::entities::Node;
use crate::domain::ports::RemoteError;
use crate::error::{NodeFailure, SwarmformError, SwarmformResult};

/// Per-node outcomes of one fan-out batch, keyed by node name
#[derive(Debug, Clone, Default)]
pub struct FanOutResult {
    outcomes: BTreeMap<String, Result<String, RemoteError>>,
}

impl FanOutResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when every node succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }

    /// Every failed node, in node-name order
    pub fn failures(&self) -> Vec<NodeFailure> {
        self.outcomes
            .iter()
            .filter_map(|(node, outcome)| {
                outcome.as_ref().err().map(|error| NodeFailure {
                    node: node.clone(),
                    error: error.clone(),
                })
            })
            .collect()
    }

    /// Convert into outputs per node, or one error naming every failed node
    pub fn into_result(self) -> SwarmformResult<BTreeMap<String, String>> {
        let failures = self.failures();
        for failure in &failures {
            tracing::warn!(
                node = %failure.node,
                host = failure.error.host(),
                unreachable = failure.error.is_transport(),
                error = %failure.error,
                "fan-out unit failed"
            );
        }
        if !failures.is_empty() {
            return Err(SwarmformError::FanOut {
                total: self.outcomes.len(),
                failures,
            });
        }
        Ok(self
            .outcomes
            .into_iter()
            .filter_map(|(node, outcome)| outcome.ok().map(|out| (node, out)))
            .collect())
    }
}

/// Run `operation` against every node concurrently
///
/// Returns only after every node has reported. A node whose unit panics is
/// recorded as a transport failure for that node.
pub fn run_on_all<F>(nodes: &[Node], operation: F) -> FanOutResult
where
    F: Fn(&Node) -> Result<String, RemoteError> + Sync,
{
    if nodes.is_empty() {
        return FanOutResult::default();
    }

    let operation = &operation;
    let (tx, rx) = mpsc::sync_channel::<(String, Result<String, RemoteError>)>(nodes.len());
    let mut outcomes = BTreeMap::new();

    thread::scope(|scope| {
        let handles: Vec<_> = nodes
            .iter()
            .map(|node| {
                let tx = tx.clone();
                let handle = scope.spawn(move || {
                    let outcome = operation(node);
                    // Capacity equals the node count, so this never blocks
                    let _ = tx.send((node.name.clone(), outcome));
                });
                (node, handle)
            })
            .collect();
        drop(tx);

        for _ in 0..nodes.len() {
            match rx.recv() {
                Ok((name, outcome)) => {
                    outcomes.insert(name, outcome);
                }
                // Every sender is gone: the missing units panicked
                Err(_) => break,
            }
        }

        for (node, handle) in handles {
            if handle.join().is_err() {
                tracing::error!(node = %node.name, "fan-out unit panicked");
                outcomes
                    .entry(node.name.clone())
                    .or_insert_with(|| {
                        Err(RemoteError::Transport {
                            host: node.host.clone(),
                            message: "operation panicked".to_string(),
                        })
                    });
            }
        }
    });

    FanOutResult { outcomes }
}
