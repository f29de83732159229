use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    Pending,
    Running,
    Stopping,
    Stopped,
    Rebooting,
    Terminated,
}

impl VmState {
    /// Maps the `InstanceStatus`/`PowerState` pair reported for a role instance.
    pub fn from_role_instance(instance_status: Option<&str>, power_state: Option<&str>) -> Self {
        if let Some(power_state) = power_state {
            match power_state.to_lowercase().as_str() {
                "stopped" => return VmState::Stopped,
                "stopping" => return VmState::Stopping,
                "starting" => return VmState::Pending,
                _ => {}
            }
        }

        match instance_status.map(|s| s.to_lowercase()).as_deref() {
            Some("readyrole") => VmState::Running,
            Some("stoppedvm") | Some("stoppedrole") => VmState::Stopped,
            Some("stoppingrole") | Some("stoppingvm") => VmState::Stopping,
            Some("restartingrole") => VmState::Rebooting,
            Some("deletingvm") => VmState::Terminated,
            _ => VmState::Pending,
        }
    }
}

impl fmt::Display for VmState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VmState::Pending => write!(f, "pending"),
            VmState::Running => write!(f, "running"),
            VmState::Stopping => write!(f, "stopping"),
            VmState::Stopped => write!(f, "stopped"),
            VmState::Rebooting => write!(f, "rebooting"),
            VmState::Terminated => write!(f, "terminated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachine {
    /// Compound `service:role` identifier.
    pub id: String,
    pub name: String,
    pub current_state: VmState,
}

#[test]
fn test_vm_state_from_role_instance() {
    assert_eq!(
        VmState::from_role_instance(Some("StoppedVM"), None),
        VmState::Stopped
    );
    assert_eq!(
        VmState::from_role_instance(Some("ReadyRole"), Some("Started")),
        VmState::Running
    );
    assert_eq!(
        VmState::from_role_instance(Some("ReadyRole"), Some("Stopped")),
        VmState::Stopped
    );
    assert_eq!(VmState::from_role_instance(None, None), VmState::Pending);
}
