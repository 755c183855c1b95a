//! Property tests for topology rules.

use proptest::prelude::*;

use swarmform::domain::entities::{bootstrap_expect, leader_of, topology};
use swarmform::{Node, Role};

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Leader), Just(Role::Manager), Just(Role::Worker)]
}

fn build(roles: &[Role]) -> Vec<Node> {
    roles
        .iter()
        .enumerate()
        .map(|(i, role)| Node::new(format!("node-{}", i), format!("10.0.0.{}", i), *role))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: bootstrap-expect is 3 with three or more voting members, else 1.
    #[test]
    fn property_bootstrap_expect_tracks_quorum(roles in proptest::collection::vec(role(), 0..10)) {
        let nodes = build(&roles);
        let voters = roles.iter().filter(|r| **r != Role::Worker).count();

        prop_assert_eq!(topology::quorum_members(&nodes), voters);
        prop_assert_eq!(bootstrap_expect(&nodes), if voters >= 3 { 3 } else { 1 });
    }

    /// PROPERTY: leader_of succeeds exactly when there is one leader.
    #[test]
    fn property_leader_of_requires_single_leader(roles in proptest::collection::vec(role(), 0..10)) {
        let nodes = build(&roles);
        let leaders = roles.iter().filter(|r| **r == Role::Leader).count();

        match leader_of(&nodes) {
            Ok(leader) => {
                prop_assert_eq!(leaders, 1);
                prop_assert_eq!(leader.role, Role::Leader);
            }
            Err(_) => {
                prop_assert_ne!(leaders, 1);
            }
        }
    }
}
