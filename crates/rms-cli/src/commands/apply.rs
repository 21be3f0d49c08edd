//! `dbrms apply`: serve a request from the pool file.
//!
//! Under the business lock: load the pool, allocate, write the pool back
//! (dry runs excepted), then append the operation record. Once the pool is
//! written the request succeeds; a failed log append is only logged.

use std::path::Path;

use chrono::Utc;
use rms_apply::store::{
    MODE_CONSUMED, MODE_PREPARED, append_operation, load_pool, operation_record, save_pool,
};
use rms_apply::{ApplyError, allocate, lock, lock_key, param_check_with_limit};
use rms_config::RmsConfig;
use rms_core::model::{GroupAllocation, RequestInputParam};
use rms_core::responses::Response;
use tracing::{info, warn};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ApplyArgs;
use crate::commands::shared;
use crate::output::output;

/// Handle `dbrms apply`.
pub async fn handle(args: &ApplyArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config()?;
    let mut param = shared::read_request(&args.request)?;
    shared::apply_defaults(&mut param, &config);

    let request_id = args.request_id.clone().unwrap_or_else(new_request_id);
    let pool_path = args.pool.as_deref().unwrap_or(&config.pool.path);

    match serve(&param, &config, pool_path, &request_id).await {
        Ok(groups) => output(&Response::ok(groups).with_request_id(&request_id), flags.format),
        Err(err) => shared::reject(err, &request_id, flags),
    }
}

async fn serve(
    param: &RequestInputParam,
    config: &RmsConfig,
    pool_path: &Path,
    request_id: &str,
) -> Result<Vec<GroupAllocation>, ApplyError> {
    param_check_with_limit(param, config.apply.max_details)?;

    let key = lock_key(param);
    let _guard = lock::acquire(
        &config.lock.dir,
        &key,
        config.lock.wait_timeout(),
        config.lock.retry_delay(),
    )
    .await?;
    info!(request_id, key = %key, dry_run = param.dry_run, "serving apply request");

    let mut pool = load_pool(pool_path)?;
    let groups = allocate(param, &mut pool)?;

    let mode = if param.dry_run {
        MODE_PREPARED
    } else {
        save_pool(pool_path, &pool)?;
        MODE_CONSUMED
    };
    // The pool is already written; a lost log line must not turn into a retry.
    let record = operation_record(param, request_id, mode, &groups);
    if let Err(err) = append_operation(&config.pool.operation_log, &record) {
        warn!(
            request_id,
            log = %config.pool.operation_log.display(),
            error = %err,
            "failed to append operation record"
        );
    }
    info!(
        request_id,
        hosts = record.bk_host_ids.len(),
        mode,
        "apply request served"
    );
    Ok(groups)
}

fn new_request_id() -> String {
    format!(
        "{}-{}",
        Utc::now().format("%Y%m%d%H%M%S%3f"),
        std::process::id()
    )
}
