use crate::error::CloudError;
use crate::integrations::async_task::AsyncTask;
use crate::integrations::data_transfer_objects::{
    Architecture, MachineImage, MachineImageFormat, Platform, VirtualMachine,
};

use async_trait::async_trait;
use reqwest::Method;
use std::fmt;

/// Signed request/response plumbing against the management API of one subscription.
#[async_trait]
pub trait ManagementTransport: Send + Sync {
    /// GETs `resource` and returns the XML body, or `None` when there is no document.
    async fn get_as_xml(&self, account: &str, resource: &str) -> Result<Option<String>, CloudError>;

    /// Issues `method` against `resource` and returns the request id the API assigned, if any.
    async fn invoke(
        &self,
        method: Method,
        account: &str,
        resource: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, CloudError>;

    async fn post(
        &self,
        account: &str,
        resource: &str,
        body: &str,
    ) -> Result<Option<String>, CloudError> {
        self.invoke(Method::POST, account, resource, Some(body)).await
    }
}

#[async_trait]
pub trait VirtualMachineSupport: Send + Sync {
    async fn get_virtual_machine(&self, vm_id: &str) -> Result<Option<VirtualMachine>, CloudError>;
}

#[async_trait]
pub trait DataCenterServices: Send + Sync {
    async fn is_subscribed(&self, service: AzureService) -> Result<bool, CloudError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzureService {
    Compute,
    Storage,
}

impl fmt::Display for AzureService {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AzureService::Compute => write!(f, "compute"),
            AzureService::Storage => write!(f, "storage"),
        }
    }
}

/// An abstract action from the identity model, e.g. `IMAGE:REMOVE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAction(pub String);

pub trait MachineImageSupport {
    async fn get_machine_image(&self, machine_image_id: &str) -> Result<Option<MachineImage>, CloudError>;

    async fn list_machine_images(&self) -> Result<Vec<MachineImage>, CloudError>;

    async fn list_machine_images_owned_by(
        &self,
        account_id: Option<&str>,
    ) -> Result<Vec<MachineImage>, CloudError>;

    async fn search_machine_images(
        &self,
        keyword: Option<&str>,
        platform: Option<Platform>,
        architecture: Option<Architecture>,
    ) -> Result<Vec<MachineImage>, CloudError>;

    async fn image_virtual_machine(
        &self,
        vm_id: &str,
        name: &str,
        description: &str,
    ) -> Result<AsyncTask<String>, CloudError>;

    async fn image_virtual_machine_to_storage(
        &self,
        vm_id: &str,
        name: &str,
        description: &str,
        directory: &str,
    ) -> Result<AsyncTask<String>, CloudError>;

    async fn remove(&self, machine_image_id: &str) -> Result<(), CloudError>;

    async fn is_image_shared_with_public(&self, machine_image_id: &str) -> Result<bool, CloudError>;

    async fn is_subscribed(&self) -> Result<bool, CloudError>;

    async fn download_image(
        &self,
        machine_image_id: &str,
        to_output: &mut (dyn std::io::Write + Send),
    ) -> Result<(), CloudError>;

    async fn install_image_from_upload(
        &self,
        format: MachineImageFormat,
        image: &[u8],
    ) -> Result<String, CloudError>;

    async fn register_machine_image(&self, at_storage_location: &str) -> Result<String, CloudError>;

    async fn share_machine_image(
        &self,
        machine_image_id: &str,
        with_account_id: &str,
        allow: bool,
    ) -> Result<(), CloudError>;

    async fn transfer(&self, from_cloud: &str, machine_image_id: &str) -> Result<String, CloudError>;

    async fn list_shares(&self, machine_image_id: &str) -> Result<Vec<String>, CloudError>;

    async fn list_supported_formats(&self) -> Result<Vec<MachineImageFormat>, CloudError>;

    fn provider_term_for_image(&self, locale: &str) -> String;

    fn has_public_library(&self) -> bool;

    fn supports_custom_images(&self) -> bool;

    fn supports_image_sharing(&self) -> bool;

    fn supports_image_sharing_with_public(&self) -> bool;

    fn map_service_action(&self, action: &ServiceAction) -> Vec<String>;
}
