use crate::policy::{ConfigField, ConfigSchema, RuleConfig};
use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{EbsBlockDevice, EbsVolume, Ec2Instance, ResourceKind};
use crate::validation::{Reporter, typed};
use awsguard_types::ids;
use serde::Deserialize;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(detailed_monitoring())?;
    registry.register(no_public_ip())?;
    registry.register(volume_in_use())?;
    registry.register(encrypted_volumes())?;
    Ok(())
}

fn detailed_monitoring() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_EC2_DETAILED_MONITORING,
        ids::NAME_EC2_DETAILED_MONITORING,
        "Checks whether detailed monitoring is enabled for EC2 instances.",
        vec![typed::<Ec2Instance, _>(
            ResourceKind::Ec2Instance,
            |instance, _, reporter| {
                if instance.monitoring != Some(true) {
                    reporter.report("EC2 instance must have detailed monitoring enabled.");
                }
                Ok(())
            },
        )],
    )
}

fn no_public_ip() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_EC2_NO_PUBLIC_IP,
        ids::NAME_EC2_NO_PUBLIC_IP,
        "Checks whether Amazon EC2 instances have a public IP association. This rule applies only to IPv4.",
        vec![typed::<Ec2Instance, _>(
            ResourceKind::Ec2Instance,
            |instance, _, reporter| {
                if instance.associate_public_ip_address == Some(true) {
                    reporter.report("EC2 instance must not have a public IP address.");
                }
                Ok(())
            },
        )],
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInUseArgs {
    check_deletion: bool,
}

fn volume_in_use() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_EC2_VOLUME_IN_USE,
        ids::NAME_EC2_VOLUME_IN_USE,
        "Checks whether EBS volumes are attached to EC2 instances. Optionally checks if EBS volumes are marked for deletion when an instance is terminated.",
        vec![typed::<Ec2Instance, _>(
            ResourceKind::Ec2Instance,
            |instance, config, reporter| {
                let args: VolumeInUseArgs = config.deserialize()?;
                let devices = instance.ebs_block_devices.as_deref().unwrap_or_default();
                if devices.is_empty() {
                    reporter.report("EC2 instance must have an EBS volume attached.");
                    return Ok(());
                }

                if args.check_deletion {
                    for device in devices.iter().filter(|d| d.delete_on_termination == Some(false)) {
                        reporter.report(format!(
                            "Attached EBS volume '{}' must be marked for deletion on instance termination.",
                            device_name(device)
                        ));
                    }
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::bool(
        "checkDeletion",
        true,
        "Also require attached volumes to be deleted when the instance terminates.",
    )]))
}

fn encrypted_volumes() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_ENCRYPTED_VOLUMES,
        ids::NAME_ENCRYPTED_VOLUMES,
        "Checks whether the EBS volumes that are in an attached state are encrypted. If you specify the ID of a KMS key for encryption using the kmsId parameter, the rule checks if the EBS volumes in an attached state are encrypted with that KMS key.",
        vec![
            typed::<Ec2Instance, _>(ResourceKind::Ec2Instance, |instance, config, reporter| {
                let attached = instance
                    .root_block_device
                    .iter()
                    .chain(instance.ebs_block_devices.iter().flatten());
                for device in attached {
                    check_encryption(
                        &device_name(device),
                        device.encrypted,
                        device.kms_key_id.as_deref(),
                        config,
                        reporter,
                    );
                }
                Ok(())
            }),
            typed::<EbsVolume, _>(ResourceKind::EbsVolume, |volume, config, reporter| {
                check_encryption(
                    "volume",
                    volume.encrypted,
                    volume.kms_key_id.as_deref(),
                    config,
                    reporter,
                );
                Ok(())
            }),
        ],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::optional_string(
        "kmsId",
        "KMS key every attached volume must be encrypted with.",
    )]))
}

fn check_encryption(
    label: &str,
    encrypted: Option<bool>,
    kms_key_id: Option<&str>,
    config: &RuleConfig,
    reporter: &mut Reporter,
) {
    if encrypted != Some(true) {
        reporter.report(format!("EBS volume '{label}' must be encrypted."));
        return;
    }
    if let Some(required) = config.string("kmsId")
        && kms_key_id != Some(required)
    {
        reporter.report(format!(
            "EBS volume '{label}' must be encrypted with KMS key '{required}'."
        ));
    }
}

fn device_name(device: &EbsBlockDevice) -> String {
    device
        .device_name
        .clone()
        .unwrap_or_else(|| "root".to_string())
}
