use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;
use azimg::integrations::data_transfer_objects::{Architecture, Platform};

use anyhow::{Result, bail};
use tracing::error;

use super::{connect, print_images};

pub async fn search(
    config_vars: Vec<ConfigVar>,
    keyword: Option<&str>,
    platform: Option<Platform>,
    architecture: Option<Architecture>,
    json: bool,
) -> Result<()> {
    let interface = connect(config_vars)?;

    let images = match interface
        .search_machine_images(keyword, platform, architecture)
        .await
    {
        Ok(images) => images,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed searching OS images: {}", e);
        }
    };

    print_images(&images, json)
}
