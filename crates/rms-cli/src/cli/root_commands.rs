use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate an apply request.
    Check(RequestArgs),
    /// Show the groups of a request in allocation order.
    Sort(RequestArgs),
    /// Summarise a request and describe each group's requirements.
    Message(RequestArgs),
    /// Serve an apply request from the pool file.
    Apply(ApplyArgs),
    /// Print the SQL selecting pool candidates for each group.
    Filter(RequestArgs),
    /// Normalise an OS name as reported by the host inventory.
    OsName(OsNameArgs),
    /// Derive the net device id from a host's inner switch IPs.
    NetDevice(NetDeviceArgs),
    /// Print the JSON schema of an apply request.
    Schema,
}

#[derive(Clone, Debug, Args)]
pub struct RequestArgs {
    /// Request JSON file, `-` for stdin.
    pub request: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ApplyArgs {
    /// Request JSON file, `-` for stdin.
    pub request: PathBuf,

    /// Pool file (overrides `pool.path`).
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Request id recorded in the operation log (generated when absent).
    #[arg(long)]
    pub request_id: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OsNameArgs {
    /// Raw OS name, e.g. `Tencent tlinux release 2.2 (Final)`.
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct NetDeviceArgs {
    /// Switch IPs separated by `,` or `;`.
    pub ips: String,
}
