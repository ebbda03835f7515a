mod cli;
mod commands;
mod config;
mod effects;
mod logging;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose, cli.log_file.as_deref());

    let file_config = config::load(cli.config.as_deref());
    let lang = config::env_language();
    let lang = lang.as_deref();

    match cli.command {
        Command::Convert(args) => {
            let settings =
                Settings::resolve(&file_config, &args.render, args.remote.as_deref(), lang);
            commands::convert::execute(args, &settings)
        }
        Command::Triage(args) => {
            let settings = Settings::resolve(&file_config, &args.render, None, lang);
            commands::triage::execute(args, &settings)
        }
        Command::Watch(args) => {
            let settings =
                Settings::resolve(&file_config, &args.render, args.remote.as_deref(), lang);
            commands::watch::execute(args, &settings)
        }
        Command::Serve(args) => {
            let settings = Settings::resolve(&file_config, &args.render, None, lang);
            commands::serve::execute(args, &settings)
        }
    }
}
