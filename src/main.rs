use anyhow::Result;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::artifacts::core::error::as_gitlet_error;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small local version-control system",
    long_about = "Gitlet tracks snapshots of a working directory: it stages files, records \
    commits, keeps branches and merges them with a three-way merge. Everything lives in \
    a .gitlet directory next to the files it tracks.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Creates .gitlet in the current directory or at the given path, with the \
        root commit \"initial commit\" on branch master."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stop tracking it",
        long_about = "Drops a staged file from the index. A file tracked by the current \
        commit is marked for removal and deleted from the working directory if unchanged."
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the current commit.\n\
        checkout <commit> -- <file> restores a file from the given commit.\n\
        checkout <branch> switches the working directory to a branch.",
        override_usage = "gitlet checkout -- <file>\n       \
        gitlet checkout <commit> -- <file>\n       \
        gitlet checkout <branch>"
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name, or a commit id when a file follows")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with a matching message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "Prints a stored blob or commit. The id may be abbreviated."
    )]
    CatFile {
        #[arg(index = 1, help = "The object id to print")]
        sha: String,
    },
}

fn main() -> ExitCode {
    init_tracing();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match as_gitlet_error(&error) {
                Some(gitlet_error) => eprintln!("{gitlet_error}"),
                None => eprintln!("{error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;

    match command {
        Commands::Init { path } => {
            let path = path.unwrap_or(pwd);
            Repository::new(&path, Box::new(std::io::stdout()))?.init()
        }
        Commands::Add { file } => stdout_repository(&pwd)?.add(&file),
        Commands::Commit { message } => stdout_repository(&pwd)?.commit(&message).map(|_| ()),
        Commands::Rm { file } => stdout_repository(&pwd)?.rm(&file),
        Commands::Checkout { target, file } => {
            let repository = stdout_repository(&pwd)?;
            match (target, file) {
                (None, Some(file)) => repository.checkout_file(&file),
                (Some(commit), Some(file)) => repository.checkout_file_from(&commit, &file),
                (Some(branch), None) => repository.checkout_branch(&branch),
                (None, None) => anyhow::bail!("Incorrect operands."),
            }
        }
        Commands::Log => with_pager(&pwd, |repository| repository.log()),
        Commands::GlobalLog => with_pager(&pwd, |repository| repository.global_log()),
        Commands::Find { message } => stdout_repository(&pwd)?.find(&message),
        Commands::Status => stdout_repository(&pwd)?.status(),
        Commands::Branch { name } => stdout_repository(&pwd)?.create_branch(&name),
        Commands::RmBranch { name } => stdout_repository(&pwd)?.delete_branch(&name),
        Commands::Reset { commit } => stdout_repository(&pwd)?.reset(&commit),
        Commands::Merge { branch } => stdout_repository(&pwd)?.merge(&branch).map(|_| ()),
        Commands::CatFile { sha } => stdout_repository(&pwd)?.cat_file(&sha),
    }
}

fn stdout_repository(pwd: &std::path::Path) -> Result<Repository> {
    Repository::new(pwd, Box::new(std::io::stdout()))
}

fn pager_enabled() -> bool {
    std::env::var_os("NO_PAGER").is_none() && std::io::stdout().is_terminal()
}

// Long history goes through the pager on an interactive terminal
fn with_pager(
    pwd: &std::path::Path,
    command: impl FnOnce(&Repository) -> Result<()>,
) -> Result<()> {
    if !pager_enabled() {
        return command(&stdout_repository(pwd)?);
    }

    let pager = Pager::new();
    let repository = Repository::new(pwd, Box::new(PagerWriter::new(pager.clone())))?;
    command(&repository)?;
    repository.writer().flush()?;

    minus::page_all(pager)?;
    Ok(())
}
