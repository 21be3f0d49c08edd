use anyhow::Context;
use rms_core::responses::Response;
use rms_query::{SqlValue, candidate_select};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RequestArgs;
use crate::commands::shared;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CandidateQuery {
    group_mark: String,
    sql: String,
    args: Vec<SqlValue>,
}

/// Handle `dbrms filter`.
pub fn handle(args: &RequestArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let param = shared::read_request(&args.request)?;
    let mut queries = Vec::with_capacity(param.details.len());
    for detail in &param.details {
        let select = candidate_select(detail, param.for_biz_id)
            .with_context(|| format!("failed to build candidate query for '{}'", detail.group_mark))?;
        queries.push(CandidateQuery {
            group_mark: detail.group_mark.clone(),
            sql: select.sql,
            args: select.args,
        });
    }
    output(&Response::ok(queries), flags.format)
}
