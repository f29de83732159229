use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;
use azimg::utils::format_owner;

use anyhow::{Result, bail};
use tracing::error;

use super::connect;

pub async fn get(config_vars: Vec<ConfigVar>, id: &str, json: bool) -> Result<()> {
    let interface = connect(config_vars)?;

    let image = match interface.get_machine_image(id).await {
        Ok(Some(image)) => image,
        Ok(None) => bail!("OS image '{}' not found", id),
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed fetching OS image '{}': {}", id, e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&image)?);
        return Ok(());
    }

    println!("\n{:<15}: {}", "ID", image.id);
    println!("{:<15}: {}", "Name", image.name);
    println!("{:<15}: {}", "Description", image.description);
    println!("{:<15}: {}", "Owner", format_owner(&image.owner));
    println!("{:<15}: {}", "Platform", image.platform);
    println!("{:<15}: {}", "Architecture", image.architecture);
    println!("{:<15}: {:?}", "State", image.state);
    println!("{:<15}: {}", "Region", image.region);
    if let Some(media_link) = &image.media_link {
        println!("{:<15}: {}", "Media link", media_link);
    }
    if !image.software.is_empty() {
        println!("{:<15}: {}", "Software", image.software);
    }

    Ok(())
}
