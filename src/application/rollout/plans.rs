//! Rollout plans
//!
//! Builds the ordered stage list of each rollout. Planning is pure: it
//! reads the topology, descriptor and context and touches no node.

use std::path::Path;
use std::time::Duration;

use crate::application::readiness::ReadinessProbe;
use crate::config::ClusterDescriptor;
use crate::domain::entities::{bootstrap_expect, Node};
use crate::domain::value_objects::{RemotePath, Secret, ServiceFlag};
use crate::error::SwarmformResult;

use super::context::RolloutContext;
use super::stage::{DeploymentStage, RolloutPlan};
use super::template_data::{
    htpasswd_entry, LoggingTemplateData, MonitoringTemplateData, ProxyTemplateData,
};

const CONSUL_DIR: &str = "traefik/consul";
const CONSUL_SERVER_CONF: &str = "traefik/consul/server/conf.json";
const CONSUL_COMPOSE: &str = "traefik/consul/consul-cluster.yml";
const TRAEFIK_STORE_CONFIG: &str = "traefik/storeconfig.yml";
const TRAEFIK_CONSUL_COMPOSE: &str = "traefik/traefik-consul.yml";
const TRAEFIK_HTTP_COMPOSE: &str = "traefik/traefik-http.yml";
const SWARMPROM_DIR: &str = "swarmprom";
const SWARMPROM_COMPOSE: &str = "swarmprom/swarmprom.yml";
const ALERTMANAGER_CONF: &str = "swarmprom/alertmanager/alertmanager.yml";
const ELK_DIR: &str = "elk";
const ELK_COMPOSE: &str = "elk/elk.yml";

const CONSUL_SYNCED: &str = "Synced node info";
const TRAEFIK_CERTIFICATE: &str = "Server responded with a certificate";
const CONSUL_DEADLINE: Duration = Duration::from_secs(5 * 60);
const TRAEFIK_DEADLINE: Duration = Duration::from_secs(3 * 60);

/// Capture key holding the leader's swarm node id
pub const CURRENT_NODE_ID: &str = "CurrentNodeId";

/// Everything a plan builder reads
pub struct PlanInputs<'a> {
    pub cluster: &'a ClusterDescriptor,
    pub nodes: &'a [Node],
    pub remote_root: &'a RemotePath,
    pub context: &'a RolloutContext,
    pub htpasswd_cost: u32,
}

impl PlanInputs<'_> {
    fn remote(&self, relative: &str) -> String {
        self.remote_root.join(Path::new(relative)).quoted()
    }

    fn stack_deploy(&self, compose: &str, stack: &str) -> String {
        format!("docker stack deploy -c {} {}", self.remote(compose), stack)
    }

    fn overlay_network(&self, name: &str) -> String {
        let encrypted = if self.context.encrypt_networks {
            " --opt encrypted"
        } else {
            ""
        };
        format!("docker network create -d overlay{} {} || true", encrypted, name)
    }
}

/// Plan for `kind`
pub fn plan_for(kind: ServiceFlag, inputs: &PlanInputs<'_>) -> SwarmformResult<RolloutPlan> {
    match kind {
        ServiceFlag::Proxy => proxy_plan(inputs),
        ServiceFlag::Monitoring => monitoring_plan(inputs),
        ServiceFlag::Logging => logging_plan(inputs),
    }
}

/// Traefik, fronted by consul and ACME certificates in production mode
pub fn proxy_plan(inputs: &PlanInputs<'_>) -> SwarmformResult<RolloutPlan> {
    let data = ProxyTemplateData::new(inputs.cluster, bootstrap_expect(inputs.nodes));
    let value = data.to_value()?;
    tracing::info!(
        quorum_members = crate::domain::entities::topology::quorum_members(inputs.nodes),
        bootstrap_expect = data.bootstrap_expect,
        acme = data.acme_enabled,
        "planning proxy rollout"
    );

    let mut stages =
        vec![DeploymentStage::new("traefik-network").on_leader(inputs.overlay_network("traefik"))];

    if inputs.context.acme_enabled {
        stages.extend([
            DeploymentStage::new("consul")
                .stage(CONSUL_DIR)
                .template(CONSUL_SERVER_CONF)
                .template(CONSUL_COMPOSE)
                .data(value.clone())
                .on_leader(inputs.stack_deploy(CONSUL_COMPOSE, "traefik"))
                .probe(log_probe("traefik_consul_server", CONSUL_SYNCED, CONSUL_DEADLINE)),
            DeploymentStage::new("store-config")
                .stage(TRAEFIK_STORE_CONFIG)
                .template(TRAEFIK_STORE_CONFIG)
                .data(value.clone())
                .on_leader(inputs.stack_deploy(TRAEFIK_STORE_CONFIG, "traefik")),
            DeploymentStage::new("leader-node-id")
                .on_leader(r#"docker node ls --format "{{if .Self}}{{.ID}}{{end}}""#)
                .capture_as(CURRENT_NODE_ID),
            DeploymentStage::new("webgateway-network")
                .on_leader(inputs.overlay_network("webgateway")),
            DeploymentStage::new("traefik")
                .stage(TRAEFIK_CONSUL_COMPOSE)
                .template(TRAEFIK_CONSUL_COMPOSE)
                .data(value)
                .on_leader(inputs.stack_deploy(TRAEFIK_CONSUL_COMPOSE, "traefik"))
                .probe(log_probe("traefik_traefik", TRAEFIK_CERTIFICATE, TRAEFIK_DEADLINE)),
            DeploymentStage::new("release-constraint").on_leader(format!(
                "docker service update --constraint-rm=\"node.id == ${{{}}}\" traefik_traefik",
                CURRENT_NODE_ID
            )),
        ]);
    } else {
        stages.extend([
            DeploymentStage::new("webgateway-network")
                .on_leader(inputs.overlay_network("webgateway")),
            DeploymentStage::new("traefik")
                .stage(TRAEFIK_HTTP_COMPOSE)
                .template(TRAEFIK_HTTP_COMPOSE)
                .data(value)
                .on_leader(inputs.stack_deploy(TRAEFIK_HTTP_COMPOSE, "traefik")),
        ]);
    }

    Ok(RolloutPlan::new(ServiceFlag::Proxy, stages))
}

/// Prometheus, grafana, alertmanager and exporters
pub fn monitoring_plan(inputs: &PlanInputs<'_>) -> SwarmformResult<RolloutPlan> {
    let ctx = inputs.context;
    let data = MonitoringTemplateData::new(
        inputs.cluster,
        ctx.secret(Secret::WebhookUrl)?,
        ctx.secret(Secret::GrafanaPassword)?,
    );

    let stages = vec![DeploymentStage::new("swarmprom")
        .stage(SWARMPROM_DIR)
        .template(ALERTMANAGER_CONF)
        .template(SWARMPROM_COMPOSE)
        .data(data.to_value()?)
        .on_leader(inputs.stack_deploy(SWARMPROM_COMPOSE, "prom"))];

    Ok(RolloutPlan::new(ServiceFlag::Monitoring, stages))
}

/// Elasticsearch, logstash, kibana and filebeat
pub fn logging_plan(inputs: &PlanInputs<'_>) -> SwarmformResult<RolloutPlan> {
    let ctx = inputs.context;
    let creds = htpasswd_entry(
        ctx.secret(Secret::KibanaUser)?,
        ctx.secret(Secret::KibanaPassword)?,
        inputs.htpasswd_cost,
    )?;
    let data = LoggingTemplateData::new(inputs.cluster, creds);

    let stages = vec![
        DeploymentStage::new("elk-config")
            .stage(ELK_DIR)
            .template(ELK_COMPOSE)
            .data(data.to_value()?),
        // Elasticsearch refuses to start below this limit
        DeploymentStage::new("vm-max-map-count")
            .on_all_nodes("sysctl -w vm.max_map_count=262144"),
        DeploymentStage::new("elk").on_leader(inputs.stack_deploy(ELK_COMPOSE, "elk")),
    ];

    Ok(RolloutPlan::new(ServiceFlag::Logging, stages))
}

fn log_probe(service: &str, marker: &str, deadline: Duration) -> ReadinessProbe {
    ReadinessProbe {
        command: format!("docker service logs {} 2>&1", service),
        success_marker: marker.to_string(),
        deadline,
        privileged: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::rollout::stage::StageTarget;
    use crate::domain::value_objects::Role;
    use std::path::PathBuf;

    fn nodes(managers: usize) -> Vec<Node> {
        let mut nodes = vec![Node::new("lead", "10.0.0.1", Role::Leader)];
        for i in 0..managers {
            nodes.push(Node::new(format!("m{}", i), format!("10.0.1.{}", i), Role::Manager));
        }
        nodes.push(Node::new("w0", "10.0.2.1", Role::Worker));
        nodes
    }

    fn cluster(acme: bool) -> ClusterDescriptor {
        ClusterDescriptor {
            name: "prod".to_string(),
            acme_enabled: acme,
            domain: "example.com".to_string(),
            email: "ops@example.com".to_string(),
            ..ClusterDescriptor::default()
        }
    }

    fn plan(kind: ServiceFlag, cluster: &ClusterDescriptor, ctx: &RolloutContext) -> RolloutPlan {
        let nodes = nodes(2);
        let root = RemotePath::new("swarmform");
        let inputs = PlanInputs {
            cluster,
            nodes: &nodes,
            remote_root: &root,
            context: ctx,
            htpasswd_cost: 4,
        };
        plan_for(kind, &inputs).unwrap()
    }

    #[test]
    fn production_proxy_has_full_stage_list() {
        let cluster = cluster(true);
        let plan = plan(ServiceFlag::Proxy, &cluster, &RolloutContext::new(&cluster));

        assert_eq!(
            plan.stage_names(),
            vec![
                "traefik-network",
                "consul",
                "store-config",
                "leader-node-id",
                "webgateway-network",
                "traefik",
                "release-constraint",
            ]
        );
        let consul = &plan.stages[1];
        assert_eq!(consul.data["BootstrapExpect"], 3);
        assert_eq!(
            consul.probe.as_ref().unwrap().deadline,
            Duration::from_secs(300)
        );
        assert_eq!(plan.stages[3].capture.as_deref(), Some(CURRENT_NODE_ID));
        assert_eq!(
            plan.stages[6].command.as_ref().unwrap().command,
            "docker service update --constraint-rm=\"node.id == ${CurrentNodeId}\" traefik_traefik"
        );
    }

    #[test]
    fn test_mode_proxy_plan_outline() {
        let cluster = cluster(false);
        let mut ctx = RolloutContext::new(&cluster);
        ctx.encrypt_networks = true;
        let plan = plan(ServiceFlag::Proxy, &cluster, &ctx);

        insta::assert_snapshot!(plan.describe(), @r###"
        rollout proxy
        1. traefik-network
           run on leader: docker network create -d overlay --opt encrypted traefik || true
        2. webgateway-network
           run on leader: docker network create -d overlay --opt encrypted webgateway || true
        3. traefik
           stage traefik/traefik-http.yml
           render traefik/traefik-http.yml
           run on leader: docker stack deploy -c 'swarmform/traefik/traefik-http.yml' traefik
        "###);
    }

    #[test]
    fn monitoring_plan_needs_secrets() {
        let cluster = cluster(false);
        let nodes = nodes(0);
        let root = RemotePath::new("swarmform");
        let ctx = RolloutContext::new(&cluster);
        let inputs = PlanInputs {
            cluster: &cluster,
            nodes: &nodes,
            remote_root: &root,
            context: &ctx,
            htpasswd_cost: 4,
        };
        assert!(monitoring_plan(&inputs).is_err());
    }

    #[test]
    fn monitoring_plan_renders_both_templates() {
        let cluster = cluster(false);
        let ctx = RolloutContext::new(&cluster)
            .with_secret(Secret::WebhookUrl, "https://hooks.example.com/T0")
            .with_secret(Secret::GrafanaPassword, "pw");
        let plan = plan(ServiceFlag::Monitoring, &cluster, &ctx);

        let stage = &plan.stages[0];
        assert_eq!(stage.files, vec![PathBuf::from("swarmprom")]);
        assert_eq!(stage.templates.len(), 2);
        assert_eq!(stage.data["GrafanaPassword"], "pw");
        assert_eq!(
            stage.command.as_ref().unwrap().command,
            "docker stack deploy -c 'swarmform/swarmprom/swarmprom.yml' prom"
        );
    }

    #[test]
    fn logging_plan_fans_out_sysctl() {
        let cluster = cluster(false);
        let ctx = RolloutContext::new(&cluster)
            .with_secret(Secret::KibanaUser, "admin")
            .with_secret(Secret::KibanaPassword, "pw");
        let plan = plan(ServiceFlag::Logging, &cluster, &ctx);

        assert_eq!(plan.stage_names(), vec!["elk-config", "vm-max-map-count", "elk"]);
        let sysctl = plan.stages[1].command.as_ref().unwrap();
        assert_eq!(sysctl.target, StageTarget::AllNodes);
        let creds = plan.stages[0].data["KibanaCreds"].as_str().unwrap();
        assert!(creds.starts_with("admin:$$2"));
    }
}
