//! Status command - show bundle, namespace and watermark details

use crate::bundle::{scan_resources, BundleInfo};
use crate::config::Config;
use crate::error::ResourceResult;
use crate::resources::conditional;
use crate::resources::service::validate_namespace;
use crate::resources::Watermark;
use crate::ui::{self, Level, UiContext};

/// Execute the status command
pub async fn execute(config: &Config) -> ResourceResult<()> {
    let ctx = UiContext::detect();
    let info = BundleInfo::from_config(config);
    let root = &config.bundle.root;

    ui::intro(&ctx, "n9res Bundle Status");

    let mut all_ok = true;

    ui::section(&ctx, "Bundle");
    if root.is_dir() {
        ui::step(&ctx, Level::Ok, &format!("Root: {}", root.display()));
    } else {
        ui::step(&ctx, Level::Fail, &format!("Root not found: {}", root.display()));
        all_ok = false;
    }
    ui::key_value(&ctx, "Symbolic name", &info.symbolic_name);
    ui::key_value(&ctx, "Library", &info.library_id);
    ui::key_value(&ctx, "Depends on", &info.dependencies.join(", "));

    ui::section(&ctx, "Resources");
    match validate_namespace(&info.namespace) {
        Ok(()) => ui::step(&ctx, Level::Ok, &format!("Namespace: .{}", info.namespace)),
        Err(e) => {
            ui::step(&ctx, Level::Fail, &e.to_string());
            all_ok = false;
        }
    }
    ui::key_value(&ctx, "URL", &info.url_path);
    match scan_resources(root, &config.resources.base_dir) {
        Ok(resources) => ui::step(
            &ctx,
            Level::Ok,
            &format!(
                "Directory: {} ({} file(s))",
                info.resource_path,
                resources.len()
            ),
        ),
        Err(e) => {
            ui::step(&ctx, Level::Fail, &e.to_string());
            all_ok = false;
        }
    }

    ui::section(&ctx, "Freshness");
    let (watermark, source) = match config.bundle.last_modified {
        Some(millis) => (Watermark::from_millis(millis), "configured"),
        None => (Watermark::of_bundle(root).await, "bundle"),
    };
    match watermark.to_datetime() {
        Some(datetime) => {
            ui::step(
                &ctx,
                Level::Ok,
                &format!(
                    "Last modified: {} ({} ms, {})",
                    datetime.to_rfc3339(),
                    watermark.millis(),
                    source
                ),
            );
            match conditional::format_http_date(watermark.millis()) {
                Some(header) => ui::key_value(&ctx, "Last-Modified header", &header),
                None => ui::step_hint(
                    &ctx,
                    Level::Warn,
                    "No Last-Modified header",
                    "watermark is past year 9999",
                ),
            }
        }
        None => ui::step_hint(
            &ctx,
            Level::Warn,
            "Last modified unknown",
            "clients will always refetch",
        ),
    }

    ui::section(&ctx, "Cache");
    if config.cache.enabled {
        ui::step(&ctx, Level::Ok, "Handles cached for process lifetime");
    } else {
        ui::step_hint(
            &ctx,
            Level::Warn,
            "Caching disabled",
            "handles rebuilt per request",
        );
    }

    println!();
    if all_ok {
        ui::remark(&ctx, "Bundle is ready to serve resources.");
    } else {
        ui::step(
            &ctx,
            Level::Warn,
            "Some checks failed. Fix the issues above before serving.",
        );
    }

    Ok(())
}
