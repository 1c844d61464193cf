use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to its handler and return the exit code.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<i32> {
    match command {
        Commands::Install(args) => commands::install::handle(&args, ctx, flags).await?,
        Commands::Update(args) => commands::update::handle(&args, ctx, flags).await?,
        Commands::Uninstall(args) => commands::uninstall::handle(&args, ctx, flags).await?,
        Commands::Run(args) => return commands::run::handle(&args, ctx, flags).await,
        Commands::List(args) => commands::list::handle(&args, ctx, flags).await?,
        Commands::Modules => commands::modules::handle(ctx, flags).await?,
        Commands::History(args) => commands::history::handle(&args, ctx, flags).await?,
        Commands::Show(args) => commands::show::handle(&args, ctx, flags).await?,
        Commands::Enable(args) => commands::toggle::handle(&args, true, ctx, flags).await?,
        Commands::Disable(args) => commands::toggle::handle(&args, false, ctx, flags).await?,
        Commands::Init(_) | Commands::Schema(_) => {
            anyhow::bail!("init and schema run before the project context is opened")
        }
    }
    Ok(0)
}
