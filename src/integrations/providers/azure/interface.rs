use crate::config::{ConfigVar, ConfigVarFinder, ProviderContext};
use crate::constants::{DEFAULT_CAPTURE_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_CAPTURES};
use crate::error::CloudError;
use crate::integrations::{DataCenterServices, ManagementTransport, VirtualMachineSupport};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use super::data_center::AzureDataCenter;
use super::method::AzureMethod;
use super::virtual_machine::AzureVirtualMachines;

/// Keeps the provider's shared session alive while a catalog fetch runs.
/// Released on drop, whatever path the fetch leaves by.
pub struct ProviderHold {
    holds: Arc<AtomicUsize>,
}

impl Drop for ProviderHold {
    fn drop(&mut self) {
        self.holds.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AzureInterface {
    pub config_vars: Vec<ConfigVar>,
    pub(super) transport: Arc<dyn ManagementTransport>,
    pub(super) virtual_machines: Arc<dyn VirtualMachineSupport>,
    pub(super) data_center: Arc<dyn DataCenterServices>,
    pub(super) capture_permits: Arc<Semaphore>,
    pub(super) capture_timeout: Option<Duration>,
    holds: Arc<AtomicUsize>,
}

impl AzureInterface {
    /// Build an interface talking to the management API with the configured
    /// subscription certificate.
    pub fn new(config_vars: Vec<ConfigVar>) -> Result<Self, CloudError> {
        let method: Arc<dyn ManagementTransport> = Arc::new(AzureMethod::from_config_vars(&config_vars)?);
        let account_number = config_vars
            .get_value("SUBSCRIPTION_ID")
            .map(|value| value.trim().to_string());
        let virtual_machines = Arc::new(AzureVirtualMachines::new(method.clone(), account_number.clone()));
        let data_center = Arc::new(AzureDataCenter::new(method.clone(), account_number));

        Self::with_collaborators(config_vars, method, virtual_machines, data_center)
    }

    pub fn with_collaborators(
        config_vars: Vec<ConfigVar>,
        transport: Arc<dyn ManagementTransport>,
        virtual_machines: Arc<dyn VirtualMachineSupport>,
        data_center: Arc<dyn DataCenterServices>,
    ) -> Result<Self, CloudError> {
        let max_captures: usize =
            config_vars.parse_value("MAX_CONCURRENT_CAPTURES", DEFAULT_MAX_CONCURRENT_CAPTURES)?;
        if max_captures == 0 {
            return Err(CloudError::Config(
                "MAX_CONCURRENT_CAPTURES must be at least 1".to_string(),
            ));
        }
        let timeout_secs: u64 =
            config_vars.parse_value("CAPTURE_TIMEOUT_SECS", DEFAULT_CAPTURE_TIMEOUT_SECS)?;
        let capture_timeout = match timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        debug!(
            "Azure interface ready: {} concurrent captures, timeout {:?}",
            max_captures, capture_timeout
        );

        Ok(Self {
            config_vars,
            transport,
            virtual_machines,
            data_center,
            capture_permits: Arc::new(Semaphore::new(max_captures)),
            capture_timeout,
            holds: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn context(&self) -> Result<ProviderContext, CloudError> {
        match ProviderContext::from_config_vars(&self.config_vars) {
            Some(ctx) => Ok(ctx),
            None => Err(CloudError::no_context()),
        }
    }

    pub fn hold(&self) -> ProviderHold {
        self.holds.fetch_add(1, Ordering::SeqCst);
        ProviderHold {
            holds: self.holds.clone(),
        }
    }

    pub fn active_holds(&self) -> usize {
        self.holds.load(Ordering::SeqCst)
    }
}
