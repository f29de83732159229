mod capabilities;
mod capture;
mod get;
mod is_public;
mod list;
mod remove;
mod search;

pub use capabilities::*;
pub use capture::*;
pub use get::*;
pub use is_public::*;
pub use list::*;
pub use remove::*;
pub use search::*;

use azimg::config::ConfigVar;
use azimg::integrations::data_transfer_objects::MachineImage;
use azimg::integrations::providers::azure::AzureInterface;
use azimg::utils::{format_owner, truncate_text};

use anyhow::{Result, bail};
use tabled::{Table, Tabled, settings::Style};
use tracing::error;

#[derive(Tabled)]
struct MachineImageDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Arch")]
    architecture: String,
    #[tabled(rename = "Software")]
    software: String,
    #[tabled(rename = "Region")]
    region: String,
}

fn connect(config_vars: Vec<ConfigVar>) -> Result<AzureInterface> {
    match AzureInterface::new(config_vars) {
        Ok(interface) => Ok(interface),
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to set up the Azure interface: {}", e)
        }
    }
}

fn print_images(images: &[MachineImage], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(images)?);
        return Ok(());
    }

    if images.is_empty() {
        println!("\nNo OS images found");
        return Ok(());
    }

    let table_rows: Vec<MachineImageDisplay> = images
        .iter()
        .map(|image| MachineImageDisplay {
            id: image.id.clone(),
            name: truncate_text(&image.name, 40),
            owner: format_owner(&image.owner),
            platform: image.platform.to_string(),
            architecture: image.architecture.to_string(),
            software: image.software.clone(),
            region: image.region.clone(),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("\nOS images:");
    println!("{}", table);
    println!("Found {} OS images", images.len());

    Ok(())
}
