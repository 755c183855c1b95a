//! Test fixtures - reusable topology and descriptor content.

#![allow(dead_code)]

/// One leader, two managers, one worker
pub const NODES_FOUR: &str = r#"- name: mgr-1
  host: 10.0.0.1
  role: leader
- name: mgr-2
  host: 10.0.0.2
  role: manager
- name: mgr-3
  host: 10.0.0.3
  role: manager
- name: work-1
  host: 10.0.0.4
  role: worker
"#;

/// Same cluster with the proxy already deployed
pub const NODES_WITH_PROXY: &str = r#"- name: mgr-1
  host: 10.0.0.1
  role: leader
  service_flags:
  - proxy
- name: mgr-2
  host: 10.0.0.2
  role: manager
- name: mgr-3
  host: 10.0.0.3
  role: manager
- name: work-1
  host: 10.0.0.4
  role: worker
"#;

/// Broken topology: two leaders
pub const NODES_TWO_LEADERS: &str = r#"- name: mgr-1
  host: 10.0.0.1
  role: leader
- name: mgr-2
  host: 10.0.0.2
  role: leader
"#;

/// Test-mode descriptor: plain HTTP proxy, no consul
pub const DESCRIPTOR_TEST_MODE: &str = r#"cluster:
  name: staging
  domain: staging.example.org
  monitoring:
    channel_name: alerts
orchestrator:
  probe_interval_secs: 1
  htpasswd_cost: 4
"#;

/// Production descriptor: consul store and ACME certificates
pub const DESCRIPTOR_ACME: &str = r#"cluster:
  name: prod
  acme_enabled: true
  encrypt_networks: true
  domain: example.org
  email: ops@example.org
orchestrator:
  probe_interval_secs: 1
  htpasswd_cost: 4
"#;
