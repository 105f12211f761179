use clap::Parser;
use visual_edit::cli::commands::{cmd_config, cmd_inject, cmd_replay, cmd_tag};
use visual_edit::cli::config::{Cli, Commands, resolve_options};
use visual_edit::trace::logger::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Resolve options: CLI > config file > defaults
    let options = resolve_options(&cli);

    match cli.command {
        Commands::Tag {
            input,
            path,
            output,
            ..
        } => {
            cmd_tag(&options, &input, &path, output.as_deref())?;
        }
        Commands::Inject {
            html,
            mode,
            command,
            output,
        } => {
            cmd_inject(&options, &html, &mode, &command, output.as_deref())?;
        }
        Commands::Config => {
            cmd_config(&options)?;
        }
        Commands::Replay { script, trace } => {
            let all_passed = cmd_replay(&script, trace.as_deref())?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
