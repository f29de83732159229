use crate::constants::HOSTED_SERVICES;
use crate::error::CloudError;
use crate::integrations::data_transfer_objects::{VirtualMachine, VmState};
use crate::integrations::{ManagementTransport, VirtualMachineSupport};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::xml::collect_entries;

/// Splits a compound `service:role` id. Trailing empty parts are dropped, so
/// `"a:"` counts as a single part; a leading one is kept, so `":roleB"` names
/// an empty service. Ids that do not come to exactly two parts use the whole
/// id for both.
pub fn split_vm_id(vm_id: &str) -> (&str, &str) {
    let mut parts: Vec<&str> = vm_id.split(':').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    match parts.as_slice() {
        [service, role] => (*service, *role),
        _ => (vm_id, vm_id),
    }
}

pub fn deployment_resource(service: &str) -> String {
    format!("{}/{}/deployments/{}", HOSTED_SERVICES, service, service)
}

pub fn role_operations_resource(service: &str, role: &str) -> String {
    format!(
        "{}/roleInstances/{}/Operations",
        deployment_resource(service),
        role
    )
}

/// Looks virtual machines up through the deployment of their hosted service.
pub struct AzureVirtualMachines {
    transport: Arc<dyn ManagementTransport>,
    account_number: Option<String>,
}

impl AzureVirtualMachines {
    pub fn new(transport: Arc<dyn ManagementTransport>, account_number: Option<String>) -> Self {
        Self {
            transport,
            account_number,
        }
    }
}

#[async_trait]
impl VirtualMachineSupport for AzureVirtualMachines {
    async fn get_virtual_machine(&self, vm_id: &str) -> Result<Option<VirtualMachine>, CloudError> {
        let account = match self.account_number.as_deref() {
            Some(account) => account,
            None => return Err(CloudError::no_context()),
        };
        let (service, role) = split_vm_id(vm_id);

        let document = match self
            .transport
            .get_as_xml(account, &deployment_resource(service))
            .await?
        {
            Some(document) => document,
            None => {
                debug!("No deployment found for hosted service '{}'", service);
                return Ok(None);
            }
        };

        let instances = match collect_entries(&document, "RoleInstance") {
            Ok(instances) => instances,
            Err(e) => {
                error!("{:?}", e);
                return Err(CloudError::Internal(format!(
                    "Unreadable deployment for hosted service '{}'",
                    service
                )));
            }
        };

        let instance = instances
            .iter()
            .find(|instance| instance.get("RoleName") == Some(role));

        Ok(instance.map(|instance| VirtualMachine {
            id: vm_id.to_string(),
            name: instance.get("InstanceName").unwrap_or(role).to_string(),
            current_state: VmState::from_role_instance(
                instance.get("InstanceStatus"),
                instance.get("PowerState"),
            ),
        }))
    }
}
