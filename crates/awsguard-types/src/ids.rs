//! Stable identifiers for built-in rules.
//!
//! `RULE_*` is the camelCase id used as a configuration key. `NAME_*` is the kebab-case
//! name shown to users next to each violation.

// API Gateway
pub const RULE_APIGATEWAY_ENDPOINT_TYPE: &str = "apiGatewayEndpointType";
pub const NAME_APIGATEWAY_ENDPOINT_TYPE: &str = "apigateway-endpoint-type-check";
pub const RULE_APIGATEWAY_METHOD_CACHED_AND_ENCRYPTED: &str = "apiGatewayMethodCachedAndEncrypted";
pub const NAME_APIGATEWAY_METHOD_CACHED_AND_ENCRYPTED: &str =
    "apigateway-method-cached-and-encrypted";
pub const RULE_APIGATEWAY_STAGE_CACHED: &str = "apiGatewayStageCached";
pub const NAME_APIGATEWAY_STAGE_CACHED: &str = "apigateway-stage-cached";

// Compute
pub const RULE_EC2_DETAILED_MONITORING: &str = "ec2InstanceDetailedMonitoringEnabled";
pub const NAME_EC2_DETAILED_MONITORING: &str = "ec2-instance-detailed-monitoring-enabled";
pub const RULE_EC2_NO_PUBLIC_IP: &str = "ec2InstanceNoPublicIP";
pub const NAME_EC2_NO_PUBLIC_IP: &str = "ec2-instance-no-public-ip";
pub const RULE_EC2_VOLUME_IN_USE: &str = "ec2VolumeInUse";
pub const NAME_EC2_VOLUME_IN_USE: &str = "ec2-volume-inuse-check";
pub const RULE_ENCRYPTED_VOLUMES: &str = "encryptedVolumes";
pub const NAME_ENCRYPTED_VOLUMES: &str = "encrypted-volumes";

// Database
pub const RULE_DYNAMODB_ENCRYPTION: &str = "dynamodbTableEncryptionEnabled";
pub const NAME_DYNAMODB_ENCRYPTION: &str = "dynamodb-table-encryption-enabled";
pub const RULE_RDS_BACKUP_ENABLED: &str = "rdsInstanceBackupEnabled";
pub const NAME_RDS_BACKUP_ENABLED: &str = "rds-instance-backup-enabled";
pub const RULE_RDS_PUBLIC_ACCESS: &str = "rdsInstancePublicAccess";
pub const NAME_RDS_PUBLIC_ACCESS: &str = "rds-instance-public-access-check";
pub const RULE_RDS_STORAGE_ENCRYPTED: &str = "rdsStorageEncrypted";
pub const NAME_RDS_STORAGE_ENCRYPTED: &str = "rds-storage-encrypted";
pub const RULE_REDSHIFT_CONFIGURATION: &str = "redshiftClusterConfiguration";
pub const NAME_REDSHIFT_CONFIGURATION: &str = "redshift-cluster-configuration";
pub const RULE_REDSHIFT_MAINTENANCE: &str = "redshiftClusterMaintenanceSettings";
pub const NAME_REDSHIFT_MAINTENANCE: &str = "redshift-cluster-maintenance-settings";
pub const RULE_REDSHIFT_PUBLIC_ACCESS: &str = "redshiftClusterPublicAccess";
pub const NAME_REDSHIFT_PUBLIC_ACCESS: &str = "redshift-cluster-public-access-check";

// Elasticsearch
pub const RULE_ELASTICSEARCH_ENCRYPTED_AT_REST: &str = "elasticsearchEncryptedAtRest";
pub const NAME_ELASTICSEARCH_ENCRYPTED_AT_REST: &str = "elasticsearch-encrypted-at-rest";
pub const RULE_ELASTICSEARCH_IN_VPC_ONLY: &str = "elasticsearchInVpcOnly";
pub const NAME_ELASTICSEARCH_IN_VPC_ONLY: &str = "elasticsearch-in-vpc-only";

// Network
pub const RULE_ELB_ACCESS_LOGGING: &str = "elbAccessLoggingEnabled";
pub const NAME_ELB_ACCESS_LOGGING: &str = "elb-logging-enabled";
pub const RULE_LB_HTTP_REDIRECT: &str = "loadBalancerHttpRedirect";
pub const NAME_LB_HTTP_REDIRECT: &str = "alb-http-to-https-redirection";
pub const RULE_SECURITY_GROUP_RULE_CONFLICTS: &str = "securityGroupNoRuleManagementConflicts";
pub const NAME_SECURITY_GROUP_RULE_CONFLICTS: &str = "security-group-no-rule-management-conflicts";

/// Every built-in rule id, sorted.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        RULE_APIGATEWAY_ENDPOINT_TYPE,
        RULE_APIGATEWAY_METHOD_CACHED_AND_ENCRYPTED,
        RULE_APIGATEWAY_STAGE_CACHED,
        RULE_DYNAMODB_ENCRYPTION,
        RULE_EC2_DETAILED_MONITORING,
        RULE_EC2_NO_PUBLIC_IP,
        RULE_EC2_VOLUME_IN_USE,
        RULE_ELASTICSEARCH_ENCRYPTED_AT_REST,
        RULE_ELASTICSEARCH_IN_VPC_ONLY,
        RULE_ELB_ACCESS_LOGGING,
        RULE_ENCRYPTED_VOLUMES,
        RULE_LB_HTTP_REDIRECT,
        RULE_RDS_BACKUP_ENABLED,
        RULE_RDS_PUBLIC_ACCESS,
        RULE_RDS_STORAGE_ENCRYPTED,
        RULE_REDSHIFT_CONFIGURATION,
        RULE_REDSHIFT_MAINTENANCE,
        RULE_REDSHIFT_PUBLIC_ACCESS,
        RULE_SECURITY_GROUP_RULE_CONFLICTS,
    ]
}
