use azimg::config::ConfigVar;
use azimg::integrations::MachineImageSupport;

use anyhow::{Result, bail};
use tabled::{Table, Tabled, settings::Style};
use tracing::error;

use super::connect;

#[derive(Tabled)]
struct CapabilityDisplay {
    #[tabled(rename = "Capability")]
    capability: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn capabilities(config_vars: Vec<ConfigVar>) -> Result<()> {
    let interface = connect(config_vars)?;

    let subscribed = match interface.is_subscribed().await {
        Ok(subscribed) => subscribed,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed checking the compute subscription: {}", e);
        }
    };
    let formats = match interface.list_supported_formats().await {
        Ok(formats) => formats,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed listing supported formats: {}", e);
        }
    };

    let row = |capability: &str, value: String| CapabilityDisplay {
        capability: capability.to_string(),
        value,
    };
    let table_rows = vec![
        row("Image term", interface.provider_term_for_image("en-US")),
        row("Subscribed to compute", subscribed.to_string()),
        row("Public library", interface.has_public_library().to_string()),
        row("Custom images", interface.supports_custom_images().to_string()),
        row("Image sharing", interface.supports_image_sharing().to_string()),
        row(
            "Public image sharing",
            interface.supports_image_sharing_with_public().to_string(),
        ),
        row(
            "Formats",
            formats
                .iter()
                .map(|format| format!("{:?}", format))
                .collect::<Vec<String>>()
                .join(", "),
        ),
    ];

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("\nAzure OS image capabilities:");
    println!("{}", table);

    Ok(())
}
