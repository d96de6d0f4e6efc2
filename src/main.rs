//! Binary entry point.
//!
//! Reads the parameter JSON from the file named in argv[1] (or from stdin
//! when no argument is given), reconciles the one resource it describes,
//! and writes a single outcome JSON object to stdout. Logs go to stderr.

use std::io::Read;
use std::process::ExitCode;

use serde::Serialize;

use grafana_provider::{init_logging, reconcile, ModuleParams, ProviderError};

/// The failure object written to stdout when reconciliation fails.
#[derive(Serialize)]
struct FailureReport {
    failed: bool,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
}

fn fail(msg: String, status_code: Option<u16>) -> ExitCode {
    let report = FailureReport {
        failed: true,
        msg,
        status_code,
    };
    match serde_json::to_string(&report) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"failed\": true, \"msg\": \"unreportable failure\"}}"),
    }
    ExitCode::FAILURE
}

fn read_params() -> Result<ModuleParams, String> {
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read parameter file {}: {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read parameters from stdin: {}", e))?;
            buf
        }
    };
    serde_json::from_str(&raw).map_err(|e| format!("invalid parameters: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let params = match read_params() {
        Ok(params) => params,
        Err(msg) => return fail(msg, None),
    };

    match reconcile::run(&params).await {
        Ok(outcome) => match serde_json::to_string(&outcome) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => fail(format!("failed to serialize outcome: {}", e), None),
        },
        Err(e) => {
            let status_code = e.status_code();
            let msg = match e {
                // The API body is the message the host shows; keep it raw.
                ProviderError::Api { body, .. } => body,
                other => other.to_string(),
            };
            fail(msg, status_code)
        }
    }
}
