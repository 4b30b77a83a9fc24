//! Ports command handler for listing the registry.

use anyhow::Result;

use searoute_lib::output::{list_ports_in_region, render_ports_text};
use searoute_lib::{list_ports, Port};

use crate::data::DataOptions;
use crate::output::{print_json, OutputFormat};

/// Handle the ports subcommand.
///
/// Lists every port, or only those in `region` (case-insensitive).
pub fn handle_ports_command(
    data: &DataOptions,
    region: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let registry = data.load_registry()?;
    let region = region.map(str::trim).filter(|r| !r.is_empty());

    match format {
        OutputFormat::Json => {
            let response = match region {
                Some(region) => list_ports_in_region(&registry, region),
                None => list_ports(&registry),
            };
            print_json(&response)?;
        }
        OutputFormat::Text => {
            let ports: Vec<&Port> = match region {
                Some(region) => registry.by_region(region),
                None => registry.list().iter().collect(),
            };
            match region {
                Some(region) if ports.is_empty() => {
                    println!("No ports found in region '{region}'.");
                }
                _ => print!("{}", render_ports_text(&ports)),
            }
        }
    }
    Ok(())
}
