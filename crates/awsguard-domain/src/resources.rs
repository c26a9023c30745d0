//! Typed views over the resource kinds the built-in rules understand.
//!
//! A subject's property bag is only deserialized into one of these shapes after its type
//! tag matched the corresponding [`ResourceKind`]. Fields are optional because hosts omit
//! unset inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed vocabulary of resource type tags used by built-in rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    AlbListener,
    AlbLoadBalancer,
    ApiGatewayMethodSettings,
    ApiGatewayRestApi,
    ApiGatewayStage,
    ApplicationLoadBalancingLoadBalancer,
    DynamodbTable,
    EbsVolume,
    Ec2Instance,
    Ec2SecurityGroup,
    Ec2SecurityGroupRule,
    ElasticLoadBalancingLoadBalancer,
    ElasticsearchDomain,
    ElbLoadBalancer,
    ElbV2Listener,
    ElbV2LoadBalancer,
    LbListener,
    LbLoadBalancer,
    RdsInstance,
    RedshiftCluster,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 20] = [
        ResourceKind::AlbListener,
        ResourceKind::AlbLoadBalancer,
        ResourceKind::ApiGatewayMethodSettings,
        ResourceKind::ApiGatewayRestApi,
        ResourceKind::ApiGatewayStage,
        ResourceKind::ApplicationLoadBalancingLoadBalancer,
        ResourceKind::DynamodbTable,
        ResourceKind::EbsVolume,
        ResourceKind::Ec2Instance,
        ResourceKind::Ec2SecurityGroup,
        ResourceKind::Ec2SecurityGroupRule,
        ResourceKind::ElasticLoadBalancingLoadBalancer,
        ResourceKind::ElasticsearchDomain,
        ResourceKind::ElbLoadBalancer,
        ResourceKind::ElbV2Listener,
        ResourceKind::ElbV2LoadBalancer,
        ResourceKind::LbListener,
        ResourceKind::LbLoadBalancer,
        ResourceKind::RdsInstance,
        ResourceKind::RedshiftCluster,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::AlbListener => "aws:alb/listener:Listener",
            ResourceKind::AlbLoadBalancer => "aws:alb/loadBalancer:LoadBalancer",
            ResourceKind::ApiGatewayMethodSettings => "aws:apigateway/methodSettings:MethodSettings",
            ResourceKind::ApiGatewayRestApi => "aws:apigateway/restApi:RestApi",
            ResourceKind::ApiGatewayStage => "aws:apigateway/stage:Stage",
            ResourceKind::ApplicationLoadBalancingLoadBalancer => {
                "aws:applicationloadbalancing/loadBalancer:LoadBalancer"
            }
            ResourceKind::DynamodbTable => "aws:dynamodb/table:Table",
            ResourceKind::EbsVolume => "aws:ebs/volume:Volume",
            ResourceKind::Ec2Instance => "aws:ec2/instance:Instance",
            ResourceKind::Ec2SecurityGroup => "aws:ec2/securityGroup:SecurityGroup",
            ResourceKind::Ec2SecurityGroupRule => "aws:ec2/securityGroupRule:SecurityGroupRule",
            ResourceKind::ElasticLoadBalancingLoadBalancer => {
                "aws:elasticloadbalancing/loadBalancer:LoadBalancer"
            }
            ResourceKind::ElasticsearchDomain => "aws:elasticsearch/domain:Domain",
            ResourceKind::ElbLoadBalancer => "aws:elb/loadBalancer:LoadBalancer",
            ResourceKind::ElbV2Listener => "aws:elasticloadbalancingv2/listener:Listener",
            ResourceKind::ElbV2LoadBalancer => "aws:elasticloadbalancingv2/loadBalancer:LoadBalancer",
            ResourceKind::LbListener => "aws:lb/listener:Listener",
            ResourceKind::LbLoadBalancer => "aws:lb/loadBalancer:LoadBalancer",
            ResourceKind::RdsInstance => "aws:rds/instance:Instance",
            ResourceKind::RedshiftCluster => "aws:redshift/cluster:Cluster",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// A string input that hosts may send either as a scalar or as a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn values(&self) -> Vec<&str> {
        match self {
            OneOrMany::One(v) => vec![v.as_str()],
            OneOrMany::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

// --- API Gateway ---

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestApi {
    pub name: Option<String>,
    pub endpoint_configuration: Option<EndpointConfiguration>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfiguration {
    pub types: Option<OneOrMany>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub stage_name: Option<String>,
    pub cache_cluster_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSettings {
    pub method_path: Option<String>,
    pub settings: Option<MethodSettingsBlock>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSettingsBlock {
    pub caching_enabled: Option<bool>,
    pub cache_data_encrypted: Option<bool>,
}

// --- Compute ---

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Instance {
    pub monitoring: Option<bool>,
    pub associate_public_ip_address: Option<bool>,
    pub ebs_block_devices: Option<Vec<EbsBlockDevice>>,
    pub root_block_device: Option<EbsBlockDevice>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsBlockDevice {
    pub device_name: Option<String>,
    pub encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
    pub delete_on_termination: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbsVolume {
    pub encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
}

// --- Database ---

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamodbTable {
    pub server_side_encryption: Option<ServerSideEncryption>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryption {
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsInstance {
    pub backup_retention_period: Option<i64>,
    pub publicly_accessible: Option<bool>,
    pub storage_encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedshiftCluster {
    pub encrypted: Option<bool>,
    pub logging: Option<RedshiftLogging>,
    pub allow_version_upgrade: Option<bool>,
    pub publicly_accessible: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedshiftLogging {
    pub enable: Option<bool>,
}

// --- Elasticsearch ---

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchDomain {
    pub domain_name: Option<String>,
    pub encrypt_at_rest: Option<EncryptAtRest>,
    pub vpc_options: Option<VpcOptions>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptAtRest {
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcOptions {
    pub subnet_ids: Option<Vec<String>>,
}

// --- Network ---

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub access_logs: Option<AccessLogs>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogs {
    pub bucket: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub protocol: Option<String>,
    pub default_actions: Option<Vec<ListenerAction>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerAction {
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    pub redirect: Option<ListenerRedirect>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRedirect {
    pub protocol: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub ingress: Option<Vec<Value>>,
    pub egress: Option<Vec<Value>>,
}

impl SecurityGroup {
    /// Whether the group manages any rules inline.
    pub fn declares_inline_rules(&self) -> bool {
        let non_empty = |rules: &Option<Vec<Value>>| rules.as_ref().is_some_and(|r| !r.is_empty());
        non_empty(&self.ingress) || non_empty(&self.egress)
    }
}
