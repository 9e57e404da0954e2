use crate::demo::{run_demo, run_recommend, run_reference_audit, AuditArgs, DemoArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wardrobe::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wardrobe Recommender",
    about = "Serve and exercise the wardrobe outfit recommender from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Recommend an outfit from a wardrobe CSV export
    Recommend(RecommendArgs),
    /// Inspect the scoring reference tables
    Reference {
        #[command(subcommand)]
        command: ReferenceCommand,
    },
    /// Recommend an outfit from a built-in sample wardrobe
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReferenceCommand {
    /// Load the tables and list subtypes that cannot be scored
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Reference {
            command: ReferenceCommand::Audit(args),
        } => run_reference_audit(args),
        Command::Demo(args) => run_demo(args),
    }
}
