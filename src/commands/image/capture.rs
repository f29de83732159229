use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;
use azimg::utils::{self, ProgressTracker};

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::{error, info};

use super::connect;

pub async fn capture(
    config_vars: Vec<ConfigVar>,
    vm_id: &str,
    name: Option<String>,
    description: &str,
    skip_confirmation: bool,
) -> Result<()> {
    let name = name.unwrap_or_else(utils::generate_image_name);

    println!("\n{:<20}: {}", "Virtual machine", vm_id);
    println!("{:<20}: {}", "Image name", name);
    println!("{:<20}: {}", "Image description", description);
    println!(
        "{}",
        "The virtual machine is deleted once the capture completes.".yellow()
    );

    if !(utils::user_confirmation(skip_confirmation, "Capture this virtual machine?")?) {
        return Ok(());
    }

    let interface = connect(config_vars)?;
    let mut task = match interface.image_virtual_machine(vm_id, &name, description).await {
        Ok(task) => task,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to start capturing '{}': {}", vm_id, e);
        }
    };
    info!("Capture of '{}' started at {}", vm_id, task.started_at());

    let tracker = ProgressTracker::new_indeterminate(&format!("Capturing {}", vm_id));
    while task.changed().await {
        tracker.set_percent(task.percent_complete());
    }

    match task.result().await {
        Ok(image_id) => {
            tracker.finish_with_message(&format!("Capture submitted as image '{}'", image_id));
            println!("{}", "Azure finishes the capture in the background.".green());
            Ok(())
        }
        Err(e) => {
            tracker.abandon_with_message("Capture failed");
            error!("{:?}", e);
            bail!("Failed capturing '{}': {}", vm_id, e)
        }
    }
}
