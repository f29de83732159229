use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;

use anyhow::{Result, bail};
use tracing::error;

use super::connect;

pub async fn is_public(config_vars: Vec<ConfigVar>, id: &str) -> Result<()> {
    let interface = connect(config_vars)?;

    match interface.is_image_shared_with_public(id).await {
        Ok(true) => println!("OS image '{}' is part of the public library", id),
        Ok(false) => println!("OS image '{}' is not public", id),
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed checking OS image '{}': {}", id, e);
        }
    }

    Ok(())
}
