use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;
use azimg::utils;

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::error;

use super::connect;

pub async fn remove(config_vars: Vec<ConfigVar>, id: &str, skip_confirmation: bool) -> Result<()> {
    println!("\n{:<10}: {}", "OS image", id);
    println!(
        "{}",
        "The VHD blob backing the image is kept in its storage account.".yellow()
    );

    if !(utils::user_confirmation(skip_confirmation, "Confirm removing this OS image?")?) {
        return Ok(());
    }

    let interface = connect(config_vars)?;
    match interface.remove(id).await {
        Ok(()) => {
            println!("OS image '{}' removed.", id);
            Ok(())
        }
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed removing OS image '{}': {}", id, e)
        }
    }
}

