//! Dispatcher entry point (spec.md §4.7): parses `argv`, resolves a leaf
//! handler, wires stdin/stdout/stderr, and maps the handler's result to an
//! exit code. Cores never call back into this module; it only validates
//! arguments, initializes logging, and formats output (spec.md §2, §7).
mod analyzer;
mod cli;
mod commands;
mod config;
mod crypto;
mod error;
mod logging;
mod pipeline;
mod profiles;
mod tree;

use clap::{CommandFactory, Parser};
use cli::{Cli, CloudCommand, Commands, ProjectCommand, TwigCommand};
use config::{ConfigFile, ResolvedConfig};
use error::ToolboxError;
use std::io::{Read, Write};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> error::Result<()> {
    if cli.init {
        let path = ConfigFile::write_default_if_missing().map_err(|e| ToolboxError::Io(
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        ))?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    if let Some(shell_name) = &cli.completions {
        return generate_completions(shell_name);
    }

    let file = ConfigFile::load().map_err(|e| ToolboxError::Io(
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    ))?;
    let resolved = ResolvedConfig::resolve(&file, cli.base_dir.as_deref(), None);

    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        println!();
        return Ok(());
    };

    let output = dispatch(command, &resolved).await?;
    if !output.is_empty() {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

async fn dispatch(command: Commands, resolved: &ResolvedConfig) -> error::Result<String> {
    match command {
        Commands::Cloud(CloudCommand::Profile(cmd)) => {
            commands::cloud::run(cmd, &resolved.base_dir)
        }
        Commands::Project(cmd) => match cmd {
            ProjectCommand::Info { path, json, markdown } => commands::project::info(path, json, markdown),
            ProjectCommand::Deps { path, json, markdown } => commands::project::deps(path, json, markdown),
            ProjectCommand::Health { path, json } => commands::project::health(path, json),
        },
        Commands::Pipeline { file, stages } => {
            let input = read_pipeline_input(file.as_deref())?;
            let output = commands::pipeline::run(&stages, input).await?;
            Ok(String::from_utf8_lossy(&output).into_owned())
        }
        Commands::Twig(cmd) => match cmd {
            TwigCommand::Gen { path, json, ndjson, depth, hidden, hash } => {
                commands::twig::gen(&path, json, ndjson, depth, hidden, hash)
            }
            TwigCommand::Create { from, target_path } => commands::twig::create(from, &target_path),
        },
        Commands::Echo { args } => commands::leaf::echo(&args),
        Commands::Pwd => commands::leaf::pwd(),
        Commands::Whoami => commands::leaf::whoami(),
        Commands::Uname => commands::leaf::uname(),
        Commands::Realpath { path } => commands::leaf::realpath(&path),
    }
}

/// Reads pipeline input from `file` if given, else from stdin (spec.md §6
/// `pipeline [-f file] <stage1> <stage2> …`).
fn read_pipeline_input(file: Option<&str>) -> error::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match file {
        Some(path) => {
            std::fs::File::open(path)
                .map_err(ToolboxError::Io)?
                .read_to_end(&mut buf)
                .map_err(ToolboxError::Io)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut buf).map_err(ToolboxError::Io)?;
        }
    }
    Ok(buf)
}

fn generate_completions(shell_name: &str) -> error::Result<()> {
    use clap_complete::{generate, Shell};

    let shell: Shell = match shell_name.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "elvish" => Shell::Elvish,
        other => {
            return Err(ToolboxError::Usage(format!(
                "unknown shell: {other} (supported: bash, zsh, fish, elvish)"
            )))
        }
    };

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "toolbox", &mut std::io::stdout());
    std::io::stdout().flush().ok();
    Ok(())
}
