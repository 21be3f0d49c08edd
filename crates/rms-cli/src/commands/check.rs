use rms_apply::{build_message, param_check_with_limit};
use rms_core::responses::Response;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RequestArgs;
use crate::commands::shared;
use crate::output::output;

/// Handle `dbrms check`.
pub fn handle(args: &RequestArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config()?;
    let mut param = shared::read_request(&args.request)?;
    shared::apply_defaults(&mut param, &config);

    if let Err(err) = param_check_with_limit(&param, config.apply.max_details) {
        return shared::reject(err, "", flags);
    }
    output(&Response::ok(build_message(&param)), flags.format)
}
