use crate::constants::HOSTED_SERVICES;
use crate::error::CloudError;
use crate::integrations::{AzureService, DataCenterServices, ManagementTransport};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Answers whether a service is enabled for the subscription by probing the
/// service's collection resource.
pub struct AzureDataCenter {
    transport: Arc<dyn ManagementTransport>,
    account_number: Option<String>,
}

impl AzureDataCenter {
    pub fn new(transport: Arc<dyn ManagementTransport>, account_number: Option<String>) -> Self {
        Self {
            transport,
            account_number,
        }
    }

    fn probe_resource(service: AzureService) -> &'static str {
        match service {
            AzureService::Compute => HOSTED_SERVICES,
            AzureService::Storage => "/services/storageservices",
        }
    }
}

#[async_trait]
impl DataCenterServices for AzureDataCenter {
    async fn is_subscribed(&self, service: AzureService) -> Result<bool, CloudError> {
        let account = match self.account_number.as_deref() {
            Some(account) => account,
            None => return Err(CloudError::no_context()),
        };

        match self
            .transport
            .get_as_xml(account, Self::probe_resource(service))
            .await
        {
            Ok(document) => Ok(document.is_some()),
            Err(CloudError::Authentication { status, .. }) => {
                debug!("Subscription check for {} denied with HTTP {}", service, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::providers::azure::testing::FakeTransport;

    #[tokio::test]
    async fn test_subscribed_when_hosted_services_are_listed() {
        let transport = Arc::new(FakeTransport::with_document(
            HOSTED_SERVICES,
            "<HostedServices xmlns=\"http://schemas.microsoft.com/windowsazure\"/>",
        ));
        let data_center = AzureDataCenter::new(transport, Some("acct".to_string()));

        assert!(data_center.is_subscribed(AzureService::Compute).await.unwrap());
        assert!(!data_center.is_subscribed(AzureService::Storage).await.unwrap());
    }

    #[tokio::test]
    async fn test_denied_access_means_not_subscribed() {
        let transport = Arc::new(FakeTransport::default());
        transport.fail_reads_with(|| CloudError::Authentication {
            status: 403,
            code: "ForbiddenError".to_string(),
            message: "The server failed to authenticate the request.".to_string(),
        });
        let data_center = AzureDataCenter::new(transport, Some("acct".to_string()));

        assert!(!data_center.is_subscribed(AzureService::Compute).await.unwrap());
    }
}
