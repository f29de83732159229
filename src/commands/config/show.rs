use azimg::config::{ConfigVar, ProviderContext};

use anyhow::Result;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ConfigVarDisplay {
    #[tabled(rename = "Variable")]
    config_var: String,
}

pub fn show(config_vars: &[ConfigVar]) -> Result<()> {
    if config_vars.is_empty() {
        println!("\nNo configuration variables found");
        println!("Set AZURE_SUBSCRIPTION_ID or pass --config <file>");
        return Ok(());
    }

    let table_rows: Vec<ConfigVarDisplay> = config_vars
        .iter()
        .map(|cv| ConfigVarDisplay {
            config_var: cv.to_string(),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("\nConfiguration:");
    println!("{}", table);

    match ProviderContext::from_config_vars(config_vars) {
        Some(ctx) => println!(
            "Acting for subscription '{}' in region '{}'",
            ctx.account_number, ctx.region_id
        ),
        None => println!("SUBSCRIPTION_ID is not set, image commands will fail"),
    }

    Ok(())
}
