use rms_core::hostinfo::{clean_os_name, net_device_id_from_switch_ips};
use rms_core::responses::Response;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{NetDeviceArgs, OsNameArgs};
use crate::output::output;

/// Handle `dbrms os-name`.
pub fn handle_os_name(args: &OsNameArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&Response::ok(clean_os_name(&args.name)), flags.format)
}

/// Handle `dbrms net-device`.
pub fn handle_net_device(args: &NetDeviceArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(
        &Response::ok(net_device_id_from_switch_ips(&args.ips)),
        flags.format,
    )
}
