use rms_apply::{all_affinities, build_message, failure_message, lock_key, sort_details};
use rms_core::responses::{ApplySummary, Response};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RequestArgs;
use crate::commands::shared;
use crate::output::output;

/// Handle `dbrms message`.
pub fn handle(args: &RequestArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config()?;
    let mut param = shared::read_request(&args.request)?;
    shared::apply_defaults(&mut param, &config);

    let summary = ApplySummary {
        summary: build_message(&param),
        lock_key: lock_key(&param),
        affinities: all_affinities(&param)
            .into_iter()
            .map(|affinity| affinity.as_str().to_string())
            .collect(),
        groups: sort_details(&param).iter().map(failure_message).collect(),
    };
    output(&Response::ok(summary), flags.format)
}
