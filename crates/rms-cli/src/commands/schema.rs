use rms_core::model::RequestInputParam;
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `dbrms schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for!(RequestInputParam), flags.format)
}
