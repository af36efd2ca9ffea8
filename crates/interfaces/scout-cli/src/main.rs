use clap::{Parser, Subcommand};
use scout_cli::commands;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API token for the stream connection
    Login {
        #[arg(long)]
        token: String,
        #[arg(long, help = "User ID to associate with the session")]
        user: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show session and backend information
    Status,
    /// Follow the live event stream, printing updates and toasts
    Watch {
        #[arg(long, help = "Also subscribe to updates for one job")]
        job: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    match cli.command {
        Commands::Login { token, user } => commands::cmd_login(token, user)?,
        Commands::Logout => commands::cmd_logout()?,
        Commands::Status => commands::cmd_status()?,
        Commands::Watch { job } => commands::cmd_watch(job).await?,
    }

    Ok(())
}
