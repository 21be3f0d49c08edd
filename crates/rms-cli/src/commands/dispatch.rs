use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Check(args) => commands::check::handle(&args, flags),
        Commands::Sort(args) => commands::sort::handle(&args, flags),
        Commands::Message(args) => commands::message::handle(&args, flags),
        Commands::Apply(args) => commands::apply::handle(&args, flags).await,
        Commands::Filter(args) => commands::filter::handle(&args, flags),
        Commands::OsName(args) => commands::hostinfo::handle_os_name(&args, flags),
        Commands::NetDevice(args) => commands::hostinfo::handle_net_device(&args, flags),
        Commands::Schema => commands::schema::handle(flags),
    }
}
