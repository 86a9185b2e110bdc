mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover, interfaces};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init()?;
    print::banner(commands.no_banner, commands.quiet);

    match &commands.command {
        Commands::Discover => {
            print::header("getting ready for discovery", commands.quiet);
            discover::discover(&commands).await
        }
        Commands::Interfaces => interfaces::interfaces(commands.quiet),
    }
}
