//! `bastion inspect` - replay a saved backend response.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bastion_backend::{
    BackendResponse, CollectingSink, ErrorCode, ErrorReport, FieldAccess, HookWhitelistMap,
    PluginUpdatePackage,
};
use bastion_config::Config;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config_bridge;

/// Arguments of the `inspect` subcommand.
pub(crate) struct InspectArgs {
    pub(crate) body: PathBuf,
    pub(crate) status: i64,
    pub(crate) headers: Option<PathBuf>,
    pub(crate) whitelist_path: Option<String>,
    pub(crate) redact: Vec<String>,
}

/// What the agent would have taken from the response.
#[derive(Debug, Serialize)]
pub(crate) struct InspectReport {
    accepted: bool,
    http_code: i64,
    errors: Vec<ErrorReport>,
    plugin: Option<PluginUpdatePackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugin_rejection: Option<String>,
    hook_whitelist: HookWhitelistMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    redacted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

/// Validate `response` and extract everything the configuration points at.
///
/// Extraction is skipped for a rejected response. Pointers in `redact` are
/// erased afterwards and the remaining body is included in the report.
pub(crate) fn inspect(
    config: &Config,
    mut response: BackendResponse,
    whitelist_path: &str,
    redact: &[String],
) -> Result<InspectReport> {
    let layout = config_bridge::to_plugin_layout(config)?;
    let sink = CollectingSink::new();
    let accepted = response.verify(ErrorCode::Agent, &sink);

    let mut plugin = None;
    let mut plugin_rejection = None;
    let mut hook_whitelist = HookWhitelistMap::default();

    if accepted {
        match response.try_build_plugin_update_package(&layout) {
            Ok(package) => plugin = package,
            Err(e) => {
                warn!(error = %e, "rejected plugin update");
                plugin_rejection = Some(e.to_string());
            },
        }
        hook_whitelist = response.build_hook_white_map(whitelist_path);
    }

    let mut redacted = Vec::new();
    for pointer in redact {
        if response.erase_value(pointer) {
            redacted.push(pointer.clone());
        } else {
            debug!(pointer = %pointer, "nothing to redact");
        }
    }
    let body = if redact.is_empty() {
        None
    } else {
        response
            .document()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to render redacted body")?
    };

    Ok(InspectReport {
        accepted,
        http_code: response.http_code(),
        errors: sink.take(),
        plugin,
        plugin_rejection,
        hook_whitelist,
        redacted,
        body,
    })
}

/// Run the subcommand, printing the report as JSON.
pub(crate) fn run(config: &Config, args: &InspectArgs) -> Result<ExitCode> {
    let body = std::fs::read_to_string(&args.body)
        .with_context(|| format!("failed to read {}", args.body.display()))?;
    let headers = match &args.headers {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };

    let response = BackendResponse::new(args.status, headers, body);
    let whitelist_path = args
        .whitelist_path
        .as_deref()
        .unwrap_or(&config.backend.hook_whitelist_path);
    let report = inspect(config, response, whitelist_path, &args.redact)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
