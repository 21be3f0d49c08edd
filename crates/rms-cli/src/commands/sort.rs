use rms_apply::sorted_indices;
use rms_core::responses::{Response, SortedDetail};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RequestArgs;
use crate::commands::shared;
use crate::output::output;

/// Handle `dbrms sort`.
pub fn handle(args: &RequestArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let param = shared::read_request(&args.request)?;
    let sorted: Vec<SortedDetail> = sorted_indices(&param)
        .into_iter()
        .map(|(idx, priority)| {
            let detail = &param.details[idx];
            SortedDetail {
                group_mark: detail.group_mark.clone(),
                priority,
                affinity: detail.affinity.as_str().to_string(),
                count: detail.count,
            }
        })
        .collect();
    output(&Response::ok(sorted), flags.format)
}
