//! In-memory collaborators for exercising the adapter without a network.

use crate::config::ConfigVar;
use crate::error::CloudError;
use crate::integrations::data_transfer_objects::{VirtualMachine, VmState};
use crate::integrations::{
    AzureService, DataCenterServices, ManagementTransport, VirtualMachineSupport,
};

use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::interface::AzureInterface;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub account: String,
    pub resource: String,
    pub body: Option<String>,
}

#[derive(Default)]
pub struct FakeTransport {
    documents: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<RecordedRequest>>,
    read_failure: Mutex<Option<fn() -> CloudError>>,
    write_failure: Mutex<Option<fn() -> CloudError>>,
    write_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeTransport {
    pub fn with_document(resource: &str, body: &str) -> Self {
        let transport = Self::default();
        transport.set_document(resource, body);
        transport
    }

    pub fn set_document(&self, resource: &str, body: &str) {
        self.documents
            .lock()
            .unwrap()
            .insert(resource.to_string(), body.to_string());
    }

    pub fn fail_reads_with(&self, failure: fn() -> CloudError) {
        *self.read_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_writes_with(&self, failure: fn() -> CloudError) {
        *self.write_failure.lock().unwrap() = Some(failure);
    }

    /// Writes block until the returned semaphore hands out a permit per write.
    pub fn gate_writes(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.write_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method != Method::GET)
            .collect()
    }

    fn record(&self, method: Method, account: &str, resource: &str, body: Option<&str>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            account: account.to_string(),
            resource: resource.to_string(),
            body: body.map(String::from),
        });
    }
}

#[async_trait]
impl ManagementTransport for FakeTransport {
    async fn get_as_xml(&self, account: &str, resource: &str) -> Result<Option<String>, CloudError> {
        self.record(Method::GET, account, resource, None);
        if let Some(failure) = *self.read_failure.lock().unwrap() {
            return Err(failure());
        }
        Ok(self.documents.lock().unwrap().get(resource).cloned())
    }

    async fn invoke(
        &self,
        method: Method,
        account: &str,
        resource: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, CloudError> {
        let gate = self.write_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.record(method, account, resource, body);
        if let Some(failure) = *self.write_failure.lock().unwrap() {
            return Err(failure());
        }
        Ok(Some("request-1".to_string()))
    }
}

#[derive(Default)]
pub struct FakeVirtualMachines {
    machines: Mutex<HashMap<String, VirtualMachine>>,
    lookups: Mutex<Vec<String>>,
}

impl FakeVirtualMachines {
    pub fn with_vm(vm_id: &str, state: VmState) -> Self {
        let vms = Self::default();
        vms.machines.lock().unwrap().insert(
            vm_id.to_string(),
            VirtualMachine {
                id: vm_id.to_string(),
                name: vm_id.to_string(),
                current_state: state,
            },
        );
        vms
    }

    pub fn remove(&self, vm_id: &str) {
        self.machines.lock().unwrap().remove(vm_id);
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl VirtualMachineSupport for FakeVirtualMachines {
    async fn get_virtual_machine(&self, vm_id: &str) -> Result<Option<VirtualMachine>, CloudError> {
        self.lookups.lock().unwrap().push(vm_id.to_string());
        Ok(self.machines.lock().unwrap().get(vm_id).cloned())
    }
}

pub struct FakeDataCenter {
    pub subscribed: AtomicBool,
}

#[async_trait]
impl DataCenterServices for FakeDataCenter {
    async fn is_subscribed(&self, service: AzureService) -> Result<bool, CloudError> {
        Ok(service == AzureService::Compute && self.subscribed.load(Ordering::SeqCst))
    }
}

pub const ACCOUNT: &str = "acct-123";

pub fn interface_with(
    transport: Arc<FakeTransport>,
    vms: Arc<FakeVirtualMachines>,
    extra_vars: Vec<ConfigVar>,
) -> AzureInterface {
    let mut config_vars = vec![
        ConfigVar::new("SUBSCRIPTION_ID", ACCOUNT),
        ConfigVar::new("REGION", "West Europe"),
    ];
    config_vars.extend(extra_vars);

    AzureInterface::with_collaborators(
        config_vars,
        transport,
        vms,
        Arc::new(FakeDataCenter {
            subscribed: AtomicBool::new(true),
        }),
    )
    .unwrap()
}
