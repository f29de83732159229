use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;

use anyhow::{Result, bail};
use tracing::error;

use super::{connect, print_images};

pub async fn list(
    config_vars: Vec<ConfigVar>,
    owner: Option<&str>,
    public: bool,
    json: bool,
) -> Result<()> {
    let interface = connect(config_vars)?;

    let listing = if public {
        interface.list_machine_images_owned_by(None).await
    } else {
        match owner {
            Some(owner) => interface.list_machine_images_owned_by(Some(owner)).await,
            None => interface.list_machine_images().await,
        }
    };

    let images = match listing {
        Ok(images) => images,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed listing OS images: {}", e);
        }
    };

    print_images(&images, json)
}
