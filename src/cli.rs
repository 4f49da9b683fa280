//! Dispatcher CLI surface (spec.md §6): `toolbox <cloud|project|pipeline|twig|...>`.
//! Generalizes the teacher's flat `Args: Parser` into a nested subcommand
//! tree — same derive style, same `#[command(...)]` doc-comment pattern.
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "toolbox",
    about = "A multi-tool command-line utility bundling cloud credentials, project analysis, streaming pipelines, and filesystem tree tools",
    long_about = None,
)]
pub struct Cli {
    /// Override the vault base directory
    #[arg(long, global = true, env = "TOOLBOX_BASE_DIR")]
    pub base_dir: Option<String>,

    /// Show debug-level logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write a default config file and exit
    #[arg(long)]
    pub init: bool,

    /// Generate shell completions and print to stdout (bash, zsh, fish, elvish)
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cloud Profile Vault — encrypted AWS/Azure/GCP credential storage
    #[command(subcommand)]
    Cloud(CloudCommand),

    /// Project Analyzer — polyglot repository introspection
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Pipeline — run line-oriented stream stages over stdin/stdout
    Pipeline {
        /// Read input from this file instead of stdin
        #[arg(short = 'f', long)]
        file: Option<String>,

        /// Stage tokens, e.g. `grep error` `sort` `head 1`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        stages: Vec<String>,
    },

    /// Filesystem Tree Engine (twig) — scan, render, and rebuild directory trees
    #[command(subcommand)]
    Twig(TwigCommand),

    /// Print arguments joined by a space
    Echo {
        args: Vec<String>,
    },
    /// Print the current working directory
    Pwd,
    /// Print the effective username
    Whoami,
    /// Print system information
    Uname,
    /// Canonicalize a path
    Realpath {
        path: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CloudCommand {
    #[command(subcommand)]
    Profile(CloudProfileCommand),
}

#[derive(Subcommand, Debug)]
pub enum CloudProfileCommand {
    /// Add a new profile; reads credentials as JSON from stdin
    Add {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        default: bool,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        role_id: Option<String>,
    },
    /// List profiles for a provider
    List {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark a profile as the provider's default
    Use {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        name: String,
    },
    /// Remove a profile
    Rm {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Full project report: type, languages, deps, git, docs, health
    Info {
        path: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        markdown: bool,
    },
    /// Dependency report only
    Deps {
        path: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        markdown: bool,
    },
    /// Health score only
    Health {
        path: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TwigCommand {
    /// Scan a directory and render its tree
    Gen {
        path: String,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        ndjson: bool,
        #[arg(long)]
        depth: Option<i64>,
        #[arg(long)]
        hidden: bool,
        #[arg(long)]
        hash: bool,
    },
    /// Materialize a rendered tree as real directories/files
    Create {
        /// Read tree text from this file instead of stdin
        #[arg(long)]
        from: Option<String>,
        target_path: String,
    },
}
