//! tdtidy-ecs
//!
//! Amazon ECS implementation of the `RegistryClient` port.
//! Uses the AWS SDK for Rust with the standard credential chain
//! (environment, shared config, instance profile, etc.).

use async_trait::async_trait;
use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::primitives::DateTime as AwsDateTime;
use aws_sdk_ecs::types::{TaskDefinition, TaskDefinitionStatus};
use chrono::{DateTime, Utc};
use tracing::debug;

use tdtidy_core::domain::{LifecycleState, Revision, RevisionArn};
use tdtidy_core::ports::{MAX_DELETE_BATCH, RegistryClient, RegistryError, RevisionPage};

/// Configuration for the ECS client.
#[derive(Debug, Clone, Default)]
pub struct EcsRegistryConfig {
    /// AWS region (e.g., "ap-northeast-1"). `None` uses the provider chain.
    pub region: Option<String>,
    /// Optional endpoint URL for testing with localstack
    pub endpoint_url: Option<String>,
}

impl EcsRegistryConfig {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }
}

/// Task-definition registry backed by Amazon ECS.
pub struct EcsRegistry {
    client: Client,
}

impl EcsRegistry {
    pub async fn new(config: EcsRegistryConfig) -> Self {
        let mut aws_config = aws_config::from_env();

        if let Some(region) = &config.region {
            aws_config = aws_config.region(aws_config::Region::new(region.clone()));
        }

        let aws_config = aws_config.load().await;

        let mut ecs_config = aws_sdk_ecs::config::Builder::from(&aws_config);

        if let Some(endpoint_url) = &config.endpoint_url {
            ecs_config = ecs_config.endpoint_url(endpoint_url);
        }

        Self::from_client(Client::from_conf(ecs_config.build()))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn status(state: LifecycleState) -> TaskDefinitionStatus {
    match state {
        LifecycleState::Active => TaskDefinitionStatus::Active,
        LifecycleState::Inactive => TaskDefinitionStatus::Inactive,
    }
}

fn to_utc(at: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(at.secs(), at.subsec_nanos())
}

/// Map an SDK task definition onto the domain model.
fn to_revision(td: &TaskDefinition) -> Result<Revision, RegistryError> {
    let arn = td
        .task_definition_arn()
        .ok_or_else(|| RegistryError::Malformed("missing taskDefinitionArn".to_string()))?;
    let family = td
        .family()
        .ok_or_else(|| RegistryError::Malformed(format!("{arn}: missing family")))?;
    let revision = u32::try_from(td.revision())
        .ok()
        .filter(|revision| *revision > 0)
        .ok_or_else(|| {
            RegistryError::Malformed(format!("{arn}: invalid revision {}", td.revision()))
        })?;

    Ok(Revision {
        arn: RevisionArn::new(arn),
        family: family.to_string(),
        revision,
        registered_at: td.registered_at().and_then(to_utc),
        deregistered_at: td.deregistered_at().and_then(to_utc),
    })
}

#[async_trait]
impl RegistryClient for EcsRegistry {
    async fn list_revisions(
        &self,
        state: LifecycleState,
        family_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<RevisionPage, RegistryError> {
        let output = self
            .client
            .list_task_definitions()
            .status(status(state))
            .set_family_prefix(family_prefix.map(str::to_string))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| RegistryError::List {
                state,
                message: DisplayErrorContext(e).to_string(),
            })?;

        Ok(RevisionPage {
            arns: output
                .task_definition_arns()
                .iter()
                .map(|arn| RevisionArn::new(arn.as_str()))
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_revision(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        let output = self
            .client
            .describe_task_definition()
            .task_definition(arn.as_str())
            .send()
            .await
            .map_err(|e| RegistryError::Describe {
                arn: arn.clone(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        let td = output.task_definition().ok_or_else(|| RegistryError::Describe {
            arn: arn.clone(),
            message: "response has no task definition".to_string(),
        })?;
        to_revision(td)
    }

    async fn deregister(&self, arn: &RevisionArn) -> Result<Revision, RegistryError> {
        let output = self
            .client
            .deregister_task_definition()
            .task_definition(arn.as_str())
            .send()
            .await
            .map_err(|e| RegistryError::Deregister {
                arn: arn.clone(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        let td = output.task_definition().ok_or_else(|| RegistryError::Deregister {
            arn: arn.clone(),
            message: "response has no task definition".to_string(),
        })?;
        to_revision(td)
    }

    async fn bulk_delete(&self, arns: &[RevisionArn]) -> Result<Vec<Revision>, RegistryError> {
        if arns.len() > MAX_DELETE_BATCH {
            return Err(RegistryError::BatchTooLarge {
                max: MAX_DELETE_BATCH,
                got: arns.len(),
            });
        }

        let output = self
            .client
            .delete_task_definitions()
            .set_task_definitions(Some(arns.iter().map(|arn| arn.to_string()).collect()))
            .send()
            .await
            .map_err(|e| RegistryError::Delete {
                arns: arns.to_vec(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        // ECS reports per-item failures in the body of a successful response.
        let failures: Vec<String> = output
            .failures()
            .iter()
            .map(|f| {
                format!(
                    "{}: {}",
                    f.arn().unwrap_or("<unknown>"),
                    f.reason().unwrap_or("<no reason>")
                )
            })
            .collect();
        if !failures.is_empty() {
            return Err(RegistryError::Delete {
                arns: arns.to_vec(),
                message: failures.join(", "),
            });
        }

        let deleted = output
            .task_definitions()
            .iter()
            .map(to_revision)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(requested = arns.len(), deleted = deleted.len(), "DeleteTaskDefinitions");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:ecs:ap-northeast-1:123456789012:task-definition/web:3";

    #[test]
    fn maps_sdk_task_definition() {
        let td = TaskDefinition::builder()
            .task_definition_arn(ARN)
            .family("web")
            .revision(3)
            .registered_at(AwsDateTime::from_secs(1_700_000_000))
            .deregistered_at(AwsDateTime::from_secs(1_700_086_400))
            .build();

        let revision = to_revision(&td).unwrap();

        assert_eq!(revision.arn.as_str(), ARN);
        assert_eq!(revision.name(), "web:3");
        assert_eq!(
            revision.registered_at,
            DateTime::from_timestamp(1_700_000_000, 0)
        );
        assert_eq!(revision.state(), LifecycleState::Inactive);
    }

    #[test]
    fn missing_timestamps_stay_absent() {
        let td = TaskDefinition::builder()
            .task_definition_arn(ARN)
            .family("web")
            .revision(3)
            .build();

        let revision = to_revision(&td).unwrap();

        assert_eq!(revision.registered_at, None);
        assert_eq!(revision.state(), LifecycleState::Active);
    }

    #[test]
    fn rejects_records_without_family() {
        let td = TaskDefinition::builder()
            .task_definition_arn(ARN)
            .revision(3)
            .build();

        let err = to_revision(&td).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed(_)));
    }

    #[test]
    fn rejects_non_positive_revision() {
        let td = TaskDefinition::builder()
            .task_definition_arn(ARN)
            .family("web")
            .revision(0)
            .build();

        assert!(to_revision(&td).is_err());
    }

    #[test]
    fn maps_lifecycle_state_to_sdk_status() {
        assert_eq!(status(LifecycleState::Active), TaskDefinitionStatus::Active);
        assert_eq!(status(LifecycleState::Inactive), TaskDefinitionStatus::Inactive);
    }

    #[test]
    fn config_builder_sets_fields() {
        let config = EcsRegistryConfig::default()
            .with_region("ap-northeast-1")
            .with_endpoint_url("http://localhost:4566");
        assert_eq!(config.region.as_deref(), Some("ap-northeast-1"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[tokio::test]
    async fn bulk_delete_rejects_oversized_batch_without_calling_ecs() {
        let conf = aws_sdk_ecs::Config::builder()
            .behavior_version(aws_sdk_ecs::config::BehaviorVersion::latest())
            .region(aws_sdk_ecs::config::Region::new("us-east-1"))
            .build();
        let registry = EcsRegistry::from_client(Client::from_conf(conf));
        let arns: Vec<RevisionArn> = (1..=11)
            .map(|i| RevisionArn::new(format!("arn:web:{i}")))
            .collect();

        let err = registry.bulk_delete(&arns).await.unwrap_err();
        assert!(matches!(err, RegistryError::BatchTooLarge { max: 10, got: 11 }));
    }
}
