//! Fetch command - dispatch resource requests against the bundle

use crate::bundle::{BundleInfo, BundleLifecycle};
use crate::cli::args::{FetchArgs, OutputFormat};
use crate::config::Config;
use crate::error::{ResourceError, ResourceResult};
use crate::resources::conditional;
use crate::resources::{ResourceRequest, ResourceResponse, ResourceService};
use crate::ui::{self, Level, UiContext};
use console::style;
use futures_util::future::join_all;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// One dispatched request as reported to the user
#[derive(Debug, Serialize)]
struct FetchOutcome {
    path: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified_http: Option<String>,
}

impl FetchOutcome {
    fn new(path: &str, response: &ResourceResponse) -> Self {
        let mut outcome = Self {
            path: path.to_string(),
            status: response.status_code(),
            content_type: None,
            location: None,
            last_modified: None,
            last_modified_http: None,
        };

        if let ResourceResponse::Content {
            handle,
            last_modified,
        } = response
        {
            outcome.content_type = Some(handle.content_type().to_string());
            outcome.location = Some(handle.content().location().to_string());
            outcome.last_modified = Some(*last_modified);
            outcome.last_modified_http = conditional::format_http_date(*last_modified);
        }

        outcome
    }
}

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> ResourceResult<()> {
    if args.output.is_some() && args.paths.len() > 1 {
        return Err(ResourceError::User(
            "--output can only be used with a single path".to_string(),
        ));
    }

    let timestamp = args.if_modified_since.as_deref().and_then(|raw| {
        let parsed = conditional::parse_client_timestamp(raw);
        if parsed.is_none() {
            warn!("Ignoring unparseable timestamp {:?}, treating copy as stale", raw);
        }
        parsed
    });

    let service = Arc::new(ResourceService::from_config(config).await?);
    let lifecycle = BundleLifecycle::start(BundleInfo::from_config(config));

    let requests: Vec<ResourceRequest> = args
        .paths
        .iter()
        .map(|path| ResourceRequest {
            path: request_path(path, &config.resources.url_root).to_string(),
            conditional_timestamp: timestamp,
        })
        .collect();

    let responses = join_all(requests.iter().map(|request| service.handle(request)))
        .await
        .into_iter()
        .collect::<ResourceResult<Vec<_>>>()?;

    if let (Some(output), Some(response)) = (args.output.as_deref(), responses.first()) {
        write_body(&service, response, output).await?;
    }

    let outcomes: Vec<FetchOutcome> = requests
        .iter()
        .zip(&responses)
        .map(|(request, response)| FetchOutcome::new(&request.path, response))
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&outcomes),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Plain => print_plain(&outcomes),
    }

    lifecycle.stop();

    match outcomes.iter().find(|o| o.status == 404) {
        Some(missing) => Err(ResourceError::ResourceNotFound(missing.path.clone())),
        None => Ok(()),
    }
}

/// Strip the host URL root so full URL paths can be passed as-is
fn request_path<'a>(path: &'a str, url_root: &str) -> &'a str {
    let root = url_root.trim_matches('/');
    let path = path.trim_start_matches('/');

    if root.is_empty() {
        return path;
    }
    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

async fn write_body(
    service: &ResourceService,
    response: &ResourceResponse,
    output: &Path,
) -> ResourceResult<()> {
    let ResourceResponse::Content { handle, .. } = response else {
        let ctx = UiContext::detect();
        ui::remark(&ctx, &format!("Nothing written to {}", output.display()));
        return Ok(());
    };

    let body = service.read(handle).await?;
    fs::write(output, &body)
        .await
        .map_err(|e| ResourceError::io(format!("writing {}", output.display()), e))?;

    info!("Wrote {} bytes to {}", body.len(), output.display());
    Ok(())
}

fn print_table(outcomes: &[FetchOutcome]) {
    let ctx = UiContext::detect();

    for outcome in outcomes {
        let status = match outcome.status {
            200 => style(outcome.status).green(),
            304 => style(outcome.status).cyan(),
            _ => style(outcome.status).red(),
        };
        let level = if outcome.status == 404 {
            Level::Fail
        } else {
            Level::Ok
        };

        let detail = match (&outcome.content_type, &outcome.last_modified_http) {
            (Some(ct), Some(lm)) => format!("{}, last modified {}", ct, lm),
            (Some(ct), None) => format!("{}, last modified unknown", ct),
            _ => String::new(),
        };

        if detail.is_empty() {
            ui::step(&ctx, level, &format!("{} {}", status, outcome.path));
        } else {
            ui::step_hint(&ctx, level, &format!("{} {}", status, outcome.path), &detail);
        }
    }
}

fn print_plain(outcomes: &[FetchOutcome]) {
    for outcome in outcomes {
        println!("{} {}", outcome.status, outcome.path);
    }
}
