//! Helpers shared by the request-reading commands.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use rms_apply::ApplyError;
use rms_config::RmsConfig;
use rms_core::model::RequestInputParam;
use rms_core::responses::Response;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Read an apply request from `path`, or from stdin when `path` is `-`.
pub fn read_request(path: &Path) -> anyhow::Result<RequestInputParam> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read request from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request '{}'", path.display()))?
    };
    serde_json::from_str(&text)
        .with_context(|| format!("invalid apply request JSON in '{}'", path.display()))
}

/// Load the layered configuration, honouring `.env`.
pub fn load_config() -> anyhow::Result<RmsConfig> {
    RmsConfig::load_with_dotenv().context("failed to load dbrms configuration")
}

/// Fill request fields the caller left to configuration.
pub fn apply_defaults(param: &mut RequestInputParam, config: &RmsConfig) {
    if param.resource_type.trim().is_empty() {
        param
            .resource_type
            .clone_from(&config.apply.default_resource_type);
    }
}

/// Print the error envelope for `err`, then hand it back as the command error.
pub fn reject(err: ApplyError, request_id: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response: Response<()> = Response::error(err.code(), err.to_string()).with_request_id(request_id);
    output(&response, flags.format)?;
    Err(err.into())
}
