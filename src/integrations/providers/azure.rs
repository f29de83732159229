pub mod classify;
pub mod data_center;
pub mod interface;
pub mod method;
pub mod os_image;
pub mod virtual_machine;
pub mod xml;

#[cfg(test)]
pub mod testing;

pub use data_center::AzureDataCenter;
pub use interface::{AzureInterface, ProviderHold};
pub use method::AzureMethod;
pub use virtual_machine::AzureVirtualMachines;
