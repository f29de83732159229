use crate::config::ProviderContext;
use crate::constants::{
    CAPTURE_SUBMITTED_PERCENT, IMAGES, MICROSOFT, PROVIDER_TERM_FOR_IMAGE, PUBLIC,
};
use crate::error::CloudError;
use crate::integrations::async_task::AsyncTask;
use crate::integrations::data_transfer_objects::{
    Architecture, MachineImage, MachineImageFormat, MachineImageState, MachineImageType, Platform,
    VmState,
};
use crate::integrations::{AzureService, MachineImageSupport, ServiceAction};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use super::classify::{
    derive_platform, detect_software, owner_for_category, platform_from_os_field, platform_matches,
};
use super::interface::AzureInterface;
use super::virtual_machine::{role_operations_resource, split_vm_id};
use super::xml::{XmlEntry, capture_role_operation, collect_entries, delete_os_image};

/// Maps one `OSImage` entry to a record. Entries without a `Name` are not images.
pub fn to_image(ctx: &ProviderContext, entry: &XmlEntry) -> Option<MachineImage> {
    let id = entry.get("name")?.to_string();
    let name = entry.get("label").unwrap_or(&id).to_string();
    let description = entry.get("description").unwrap_or(&name).to_string();
    let owner = owner_for_category(entry.get("category"), &ctx.account_number);

    let mut image = MachineImage {
        id,
        name,
        description,
        owner,
        platform: Platform::Unknown,
        architecture: Architecture::I64,
        state: MachineImageState::Active,
        region: ctx.region_id.clone(),
        media_link: entry.get("medialink").map(String::from),
        software: String::new(),
        image_type: MachineImageType::Storage,
        tags: HashMap::new(),
    };

    let descriptor = image.descriptor();
    image.platform = derive_platform(platform_from_os_field(entry.get("os")), &descriptor);
    image.software = detect_software(&descriptor);

    Some(image)
}

/// Keeps images whose owner is one of `accounts`, compared case-insensitively.
pub fn filter_by_owner(images: Vec<MachineImage>, accounts: &[&str]) -> Vec<MachineImage> {
    images
        .into_iter()
        .filter(|image| {
            accounts
                .iter()
                .any(|account| account.eq_ignore_ascii_case(&image.owner))
        })
        .collect()
}

pub fn search_filter(
    images: Vec<MachineImage>,
    keyword: Option<&str>,
    platform: Option<Platform>,
    architecture: Option<Architecture>,
) -> Vec<MachineImage> {
    let platform = platform.filter(|platform| *platform != Platform::Unknown);

    images
        .into_iter()
        .filter(|image| match architecture {
            Some(architecture) => image.architecture == architecture,
            None => true,
        })
        .filter(|image| match platform {
            Some(requested) => platform_matches(requested, image.platform),
            None => true,
        })
        .filter(|image| match keyword {
            Some(keyword) => {
                image.id.contains(keyword)
                    || image.name.contains(keyword)
                    || image.description.contains(keyword)
            }
            None => true,
        })
        .collect()
}

impl AzureInterface {
    /// Fetches the whole catalog and keeps the images owned by `accounts`.
    async fn populate_images(
        &self,
        ctx: &ProviderContext,
        accounts: &[&str],
    ) -> Result<Vec<MachineImage>, CloudError> {
        let _hold = self.hold();

        let document = match self.transport.get_as_xml(&ctx.account_number, IMAGES).await? {
            Some(document) if !document.trim().is_empty() => document,
            _ => {
                error!("Azure returned no image catalog for account '{}'", ctx.account_number);
                return Err(CloudError::illegal_access());
            }
        };

        let entries = match collect_entries(&document, "OSImage") {
            Ok(entries) => entries,
            Err(e) => {
                error!("{:?}", e);
                return Err(CloudError::illegal_access());
            }
        };

        let mut images = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            match to_image(ctx, entry) {
                Some(image) => images.push(image),
                None => warn!("Skipping OS image without a name"),
            }
        }
        debug!("Parsed {} OS images from the catalog", images.len());

        Ok(filter_by_owner(images, accounts))
    }
}

impl MachineImageSupport for AzureInterface {
    async fn get_machine_image(&self, machine_image_id: &str) -> Result<Option<MachineImage>, CloudError> {
        let ctx = self.context()?;
        let images = self
            .populate_images(&ctx, &[MICROSOFT, ctx.account_number.as_str(), PUBLIC])
            .await?;

        Ok(images
            .into_iter()
            .find(|image| image.id == machine_image_id))
    }

    async fn list_machine_images(&self) -> Result<Vec<MachineImage>, CloudError> {
        let ctx = self.context()?;
        self.populate_images(&ctx, &[ctx.account_number.as_str()]).await
    }

    async fn list_machine_images_owned_by(
        &self,
        account_id: Option<&str>,
    ) -> Result<Vec<MachineImage>, CloudError> {
        let ctx = self.context()?;
        let accounts = match account_id {
            Some(account_id) => vec![account_id],
            None => vec![MICROSOFT, PUBLIC],
        };
        self.populate_images(&ctx, &accounts).await
    }

    async fn search_machine_images(
        &self,
        keyword: Option<&str>,
        platform: Option<Platform>,
        architecture: Option<Architecture>,
    ) -> Result<Vec<MachineImage>, CloudError> {
        let ctx = self.context()?;
        let images = self
            .populate_images(&ctx, &[MICROSOFT, ctx.account_number.as_str(), PUBLIC])
            .await?;

        Ok(search_filter(images, keyword, platform, architecture))
    }

    async fn image_virtual_machine(
        &self,
        vm_id: &str,
        name: &str,
        description: &str,
    ) -> Result<AsyncTask<String>, CloudError> {
        let ctx = self.context()?;
        let vm = match self.virtual_machines.get_virtual_machine(vm_id).await? {
            Some(vm) => vm,
            None => {
                return Err(CloudError::NotFound(format!(
                    "No such virtual machine: {}",
                    vm_id
                )));
            }
        };
        if vm.current_state != VmState::Stopped {
            return Err(CloudError::Precondition(
                "The server must be paused in order to create an image.".to_string(),
            ));
        }

        let transport = self.transport.clone();
        let permits = self.capture_permits.clone();
        let name = name.to_string();
        let description = description.to_string();
        info!("Capturing virtual machine '{}' as image '{}'", vm.id, name);

        Ok(AsyncTask::spawn(self.capture_timeout, move |progress| async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("{:?}", e);
                    return Err(CloudError::Internal("Capture pool is closed".to_string()));
                }
            };

            let label = BASE64.encode(description.as_bytes());
            let (service, role) = split_vm_id(&vm.id);
            let resource = role_operations_resource(service, role);
            let xml = capture_role_operation(&label, &name);

            progress.set_percent_complete(CAPTURE_SUBMITTED_PERCENT);
            let request_id = transport.post(&ctx.account_number, &resource, &xml).await?;
            debug!("Capture of '{}' accepted as request {:?}", vm.id, request_id);

            Ok(name)
        }))
    }

    async fn image_virtual_machine_to_storage(
        &self,
        _vm_id: &str,
        _name: &str,
        _description: &str,
        _directory: &str,
    ) -> Result<AsyncTask<String>, CloudError> {
        Err(CloudError::not_supported())
    }

    async fn remove(&self, machine_image_id: &str) -> Result<(), CloudError> {
        let ctx = self.context()?;
        let image = match self.get_machine_image(machine_image_id).await? {
            Some(image) => image,
            None => {
                return Err(CloudError::NotFound(format!(
                    "No such machine image: {}",
                    machine_image_id
                )));
            }
        };

        let xml = delete_os_image(&image.name);
        let resource = format!("{}/{}", IMAGES, machine_image_id);
        // The VHD blob behind the image is left in the storage account.
        self.transport
            .invoke(Method::DELETE, &ctx.account_number, &resource, Some(&xml))
            .await?;
        info!("Removed OS image '{}'", machine_image_id);

        Ok(())
    }

    async fn is_image_shared_with_public(&self, machine_image_id: &str) -> Result<bool, CloudError> {
        let image = self.get_machine_image(machine_image_id).await?;

        Ok(image.is_some_and(|image| image.owner == MICROSOFT || image.owner == PUBLIC))
    }

    async fn is_subscribed(&self) -> Result<bool, CloudError> {
        self.data_center.is_subscribed(AzureService::Compute).await
    }

    async fn download_image(
        &self,
        _machine_image_id: &str,
        _to_output: &mut (dyn std::io::Write + Send),
    ) -> Result<(), CloudError> {
        Err(CloudError::not_supported())
    }

    async fn install_image_from_upload(
        &self,
        _format: MachineImageFormat,
        _image: &[u8],
    ) -> Result<String, CloudError> {
        Err(CloudError::not_supported())
    }

    async fn register_machine_image(&self, _at_storage_location: &str) -> Result<String, CloudError> {
        Err(CloudError::Unsupported(
            "Image registration is not required in Azure".to_string(),
        ))
    }

    async fn share_machine_image(
        &self,
        _machine_image_id: &str,
        _with_account_id: &str,
        _allow: bool,
    ) -> Result<(), CloudError> {
        Err(CloudError::Unsupported(
            "Image sharing is not supported in Azure".to_string(),
        ))
    }

    async fn transfer(&self, _from_cloud: &str, _machine_image_id: &str) -> Result<String, CloudError> {
        Err(CloudError::Unsupported(
            "You cannot transfer Azure images".to_string(),
        ))
    }

    async fn list_shares(&self, _machine_image_id: &str) -> Result<Vec<String>, CloudError> {
        Ok(vec![])
    }

    async fn list_supported_formats(&self) -> Result<Vec<MachineImageFormat>, CloudError> {
        // Azure has no import/export format; callers expect at least one entry.
        Ok(vec![MachineImageFormat::Aws])
    }

    fn provider_term_for_image(&self, _locale: &str) -> String {
        PROVIDER_TERM_FOR_IMAGE.to_string()
    }

    fn has_public_library(&self) -> bool {
        true
    }

    fn supports_custom_images(&self) -> bool {
        true
    }

    fn supports_image_sharing(&self) -> bool {
        false
    }

    fn supports_image_sharing_with_public(&self) -> bool {
        false
    }

    fn map_service_action(&self, _action: &ServiceAction) -> Vec<String> {
        vec![]
    }
}
