//! List command - show resources served from the bundle

use crate::bundle::{scan_resources, BundleInfo, BundleResource};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::ResourceResult;
use crate::ui::{self, Level, UiContext};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct ListedResource<'a> {
    url: String,
    #[serde(flatten)]
    resource: &'a BundleResource,
}

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> ResourceResult<()> {
    let info = BundleInfo::from_config(config);
    let resources = scan_resources(&config.bundle.root, &config.resources.base_dir)?;

    if resources.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step(&ctx, Level::Info, "No resources found");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&info, &resources),
        OutputFormat::Json => print_json(&info, &resources)?,
        OutputFormat::Plain => print_plain(&info, &resources),
    }

    Ok(())
}

fn print_table(info: &BundleInfo, resources: &[BundleResource]) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, &format!("Resources under {}", info.url_path));

    println!(
        "{:<40} {:>10} {:<28} {:<16}",
        style("NAME").bold(),
        style("SIZE").bold(),
        style("TYPE").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(97));

    for resource in resources {
        let modified = resource
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<40} {:>10} {:<28} {:<16}",
            resource.name,
            format_bytes(resource.size),
            resource.content_type,
            modified
        );
    }

    println!();
    println!("{} resource(s)", resources.len());
}

fn print_json(info: &BundleInfo, resources: &[BundleResource]) -> ResourceResult<()> {
    let listed: Vec<ListedResource<'_>> = resources
        .iter()
        .map(|resource| ListedResource {
            url: info.resource_url(&resource.name),
            resource,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}

fn print_plain(info: &BundleInfo, resources: &[BundleResource]) {
    for resource in resources {
        println!("{}", info.resource_url(&resource.name));
    }
}

/// Format bytes as human-readable size (e.g., "1.5 KB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
