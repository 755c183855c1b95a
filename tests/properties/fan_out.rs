//! Property tests for fan-out aggregation.

use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use swarmform::application::run_on_all;
use swarmform::domain::ports::RemoteError;
use swarmform::{Node, Role};

fn nodes(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let role = if i == 0 { Role::Leader } else { Role::Worker };
            Node::new(format!("node-{:02}", i), format!("10.0.0.{}", i), role)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: K failing nodes out of N yield exactly K reported failures,
    /// whatever order the units finish in.
    #[test]
    fn property_fan_out_reports_every_failure(
        plan in proptest::collection::vec((any::<bool>(), 0u64..4), 1..12),
    ) {
        let nodes = nodes(plan.len());
        let result = run_on_all(&nodes, |node| {
            let index: usize = node.name[5..].parse().unwrap();
            let (fails, delay_ms) = plan[index];
            thread::sleep(Duration::from_millis(delay_ms));
            if fails {
                Err(RemoteError::Transport {
                    host: node.host.clone(),
                    message: "unreachable".to_string(),
                })
            } else {
                Ok(node.name.clone())
            }
        });

        let expected_failures = plan.iter().filter(|(fails, _)| *fails).count();
        prop_assert_eq!(result.len(), plan.len());
        prop_assert_eq!(result.failures().len(), expected_failures);
        prop_assert_eq!(result.is_success(), expected_failures == 0);

        for failure in result.failures() {
            let index: usize = failure.node[5..].parse().unwrap();
            prop_assert!(plan[index].0);
        }
    }
}
