use crate::policy::{ConfigField, ConfigSchema};
use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{DynamodbTable, RdsInstance, RedshiftCluster, ResourceKind};
use crate::validation::typed;
use awsguard_types::ids;
use serde::Deserialize;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(dynamodb_encryption())?;
    registry.register(rds_backup_enabled())?;
    registry.register(rds_public_access())?;
    registry.register(rds_storage_encrypted())?;
    registry.register(redshift_configuration())?;
    registry.register(redshift_maintenance())?;
    registry.register(redshift_public_access())?;
    Ok(())
}

fn dynamodb_encryption() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_DYNAMODB_ENCRYPTION,
        ids::NAME_DYNAMODB_ENCRYPTION,
        "Checks that DynamoDB tables have server side encryption enabled.",
        vec![typed::<DynamodbTable, _>(
            ResourceKind::DynamodbTable,
            |table, _, reporter| {
                let enabled = table
                    .server_side_encryption
                    .as_ref()
                    .and_then(|sse| sse.enabled);
                if enabled != Some(true) {
                    reporter.report("Dynamodb must have server side encryption enabled.");
                }
                Ok(())
            },
        )],
    )
}

fn rds_backup_enabled() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_RDS_BACKUP_ENABLED,
        ids::NAME_RDS_BACKUP_ENABLED,
        "Checks whether RDS DB instances have backups enabled. Optionally checks the backup retention period.",
        vec![typed::<RdsInstance, _>(
            ResourceKind::RdsInstance,
            |instance, config, reporter| {
                let retention = instance.backup_retention_period.unwrap_or(0);
                if retention <= 0 {
                    reporter.report("RDS Instances must have backups enabled.");
                    return Ok(());
                }
                if let Some(minimum) = config.integer("backupRetentionPeriod")
                    && retention < minimum
                {
                    reporter.report(format!(
                        "RDS Instance backup retention period must be at least {minimum} days, found {retention}."
                    ));
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::optional_integer(
        "backupRetentionPeriod",
        "Minimum number of days backups are retained.",
    )]))
}

fn rds_public_access() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_RDS_PUBLIC_ACCESS,
        ids::NAME_RDS_PUBLIC_ACCESS,
        "Checks whether the Amazon Relational Database Service (RDS) instances are not publicly accessible.",
        vec![typed::<RdsInstance, _>(
            ResourceKind::RdsInstance,
            |instance, _, reporter| {
                if instance.publicly_accessible == Some(true) {
                    reporter.report("RDS Instance must not be publicly accessible.");
                }
                Ok(())
            },
        )],
    )
}

fn rds_storage_encrypted() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_RDS_STORAGE_ENCRYPTED,
        ids::NAME_RDS_STORAGE_ENCRYPTED,
        "Checks whether storage encryption is enabled for your RDS DB instances.",
        vec![typed::<RdsInstance, _>(
            ResourceKind::RdsInstance,
            |instance, config, reporter| {
                if instance.storage_encrypted != Some(true) {
                    reporter.report("RDS Instance must have storage encryption enabled.");
                } else if let Some(required) = config.string("kmsKeyId")
                    && instance.kms_key_id.as_deref() != Some(required)
                {
                    reporter.report(format!(
                        "RDS Instance must be encrypted with KMS key '{required}'."
                    ));
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::optional_string(
        "kmsKeyId",
        "KMS key the storage must be encrypted with.",
    )]))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedshiftConfigurationArgs {
    cluster_db_encrypted: bool,
    logging_enabled: bool,
}

fn redshift_configuration() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_REDSHIFT_CONFIGURATION,
        ids::NAME_REDSHIFT_CONFIGURATION,
        "Checks whether Amazon Redshift clusters have the specified settings.",
        vec![typed::<RedshiftCluster, _>(
            ResourceKind::RedshiftCluster,
            |cluster, config, reporter| {
                let args: RedshiftConfigurationArgs = config.deserialize()?;
                if args.cluster_db_encrypted && cluster.encrypted != Some(true) {
                    reporter.report("Redshift cluster must be encrypted.");
                }
                let logging = cluster.logging.as_ref().and_then(|l| l.enable);
                if args.logging_enabled && logging != Some(true) {
                    reporter.report("Redshift cluster must have logging enabled.");
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![
        ConfigField::bool("clusterDbEncrypted", true, "Require database encryption."),
        ConfigField::bool("loggingEnabled", true, "Require audit logging."),
    ]))
}

fn redshift_maintenance() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_REDSHIFT_MAINTENANCE,
        ids::NAME_REDSHIFT_MAINTENANCE,
        "Checks whether Amazon Redshift clusters have the specified maintenance settings.",
        vec![typed::<RedshiftCluster, _>(
            ResourceKind::RedshiftCluster,
            |cluster, config, reporter| {
                let required = config.bool("allowVersionUpgrade").unwrap_or(true);
                if required && cluster.allow_version_upgrade != Some(true) {
                    reporter.report("Redshift cluster must allow version upgrades.");
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::bool(
        "allowVersionUpgrade",
        true,
        "Require major version upgrades to be allowed during maintenance.",
    )]))
}

fn redshift_public_access() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_REDSHIFT_PUBLIC_ACCESS,
        ids::NAME_REDSHIFT_PUBLIC_ACCESS,
        "Checks whether Amazon Redshift clusters are not publicly accessible.",
        vec![typed::<RedshiftCluster, _>(
            ResourceKind::RedshiftCluster,
            |cluster, _, reporter| {
                // Redshift clusters are public unless told otherwise.
                if cluster.publicly_accessible != Some(false) {
                    reporter.report("Redshift cluster must not be publicly accessible.");
                }
                Ok(())
            },
        )],
    )
}
