//! Preact CLI - Project scaffolding from Preact templates

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use scaffolder_core::templates::TemplateChoice;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{CreateError, GitIdentity, PackageManager, ProductConfig, StaticResource};
use std::path::PathBuf;
use std::process::ExitCode;

/// Preact product configuration
#[derive(Clone)]
pub struct PreactConfig;

impl ProductConfig for PreactConfig {
    fn name(&self) -> &'static str {
        "preact-create"
    }

    fn display_name(&self) -> &'static str {
        "Preact CLI"
    }

    fn default_org(&self) -> &'static str {
        "preactjs-templates"
    }

    fn default_archive_url(&self) -> &'static str {
        "https://github.com"
    }

    fn archive_url_env(&self) -> &'static str {
        "PREACT_ARCHIVE_URL"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://api.github.com/users/preactjs-templates/repos"
    }

    fn registry_url_env(&self) -> &'static str {
        "PREACT_REGISTRY_URL"
    }

    fn cache_file_name(&self) -> &'static str {
        "preact-templates.json"
    }

    fn fallback_templates(&self) -> Vec<TemplateChoice> {
        vec![
            TemplateChoice::new(
                "preactjs-templates/default",
                "default",
                "The default template for Preact CLI",
            ),
            TemplateChoice::new(
                "preactjs-templates/typescript",
                "typescript",
                "The default template for Preact CLI in typescript",
            ),
            TemplateChoice::new(
                "preactjs-templates/simple",
                "simple",
                "A simple, minimal \"Hello World\" template for Preact CLI",
            ),
            TemplateChoice::new(
                "preactjs-templates/widget",
                "widget",
                "Template for a widget to be embedded in another website",
            ),
            TemplateChoice::new(
                "preactjs-templates/widget-typescript",
                "widget-typescript",
                "Typescript template for a widget to be embedded in another website",
            ),
        ]
    }

    fn resourceless_marker(&self) -> &'static str {
        "widget"
    }

    fn static_resources(&self) -> Vec<StaticResource> {
        vec![
            StaticResource {
                file_name: "template.html",
                contents: include_str!("../resources/template.html"),
            },
            StaticResource {
                file_name: "sw.js",
                contents: include_str!("../resources/sw.js"),
            },
        ]
    }

    fn git_identity(&self) -> GitIdentity {
        GitIdentity {
            name: "Preact CLI",
            email: "preact-cli@users.noreply.github.com",
            commit_message: "initial commit from Preact CLI",
        }
    }

    fn next_steps(&self, dest: &str, package_manager: PackageManager) -> Vec<String> {
        let pfx = package_manager.run_prefix();
        vec![
            format!("To get started, cd into the new directory: cd {}", dest),
            format!("To start a development live-reload server: {} dev", pfx),
            format!("To create a production build (in ./build): {} build", pfx),
            format!("To start a production HTTP/2 server: {} serve", pfx),
        ]
    }

    fn cli_description(&self) -> &'static str {
        "Create Preact applications from official or custom templates"
    }
}

#[derive(Parser, Debug)]
#[command(name = "preact-create")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // `create` is the default command
    #[command(flatten)]
    pub create: CliCreateArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new application
    Create(CliCreateArgs),
    /// List official templates
    List,
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Template to use (`name`, `user/repo` or `user/repo#tag`)
    pub template: Option<String>,

    /// Directory to create the app within
    pub dest: Option<String>,

    /// The application name
    #[arg(long)]
    pub name: Option<String>,

    /// A directory to use instead of $PWD
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Force destination output; will override!
    #[arg(long)]
    pub force: bool,

    /// Install dependencies
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub install: Option<bool>,

    /// Skip installing dependencies
    #[arg(long = "no-install", conflicts_with = "install")]
    pub no_install: bool,

    /// Initialize a git repository
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub git: Option<bool>,

    /// Skip initializing a git repository
    #[arg(long = "no-git", conflicts_with = "git")]
    pub no_git: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Local directory laid out as `<dir>/<org>/<repo>` to use instead of
    /// downloading (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            dest: args.dest,
            name: args.name,
            cwd: args.cwd,
            force: args.force,
            install: if args.no_install {
                Some(false)
            } else {
                args.install
            },
            git: if args.no_git { Some(false) } else { args.git },
            verbose: args.verbose,
        }
    }
}

/// Map a clap failure onto an exit code, printing it the way every other failure is printed
fn usage_failure(err: clap::Error, raw_args: &[String]) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        ErrorKind::UnknownArgument => {
            let argument = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => arg.clone(),
                _ => String::from("<unknown>"),
            };
            let command = invoked_command(raw_args);
            report_failure(
                &CreateError::InvalidArgument { argument, command }.into(),
                false,
            );
            ExitCode::FAILURE
        }
        _ => {
            let _ = err.print();
            ExitCode::FAILURE
        }
    }
}

/// Parse the command line, taking the about text from the product
fn parse_args<C: ProductConfig>(config: &C, raw_args: &[String]) -> Result<Args, clap::Error> {
    let matches = Args::command()
        .about(config.cli_description())
        .try_get_matches_from(raw_args)?;
    Args::from_arg_matches(&matches)
}

/// `list` when that subcommand was named, otherwise `create`
fn invoked_command(raw_args: &[String]) -> String {
    let named = raw_args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .map(String::as_str);
    match named {
        Some("list") => "list".to_string(),
        _ => "create".to_string(),
    }
}

fn report_failure(err: &anyhow::Error, verbose: bool) {
    eprintln!();
    eprintln!(" {} {}", "ERROR".red().bold(), err);
    if verbose {
        for cause in err.chain().skip(1) {
            eprintln!("   {} {}", "caused by:".dimmed(), cause);
        }
    }
    eprintln!();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let raw_args: Vec<String> = std::env::args().collect();
    let config = PreactConfig;
    let args = match parse_args(&config, &raw_args) {
        Ok(args) => args,
        Err(err) => return usage_failure(err, &raw_args),
    };

    let (result, verbose) = match args.command {
        Some(Command::List) => (scaffolder_core::list(&config).await, false),
        Some(Command::Create(create_args)) => {
            let verbose = create_args.verbose;
            (scaffolder_core::run(&config, create_args.into()).await, verbose)
        }
        None => {
            // No subcommand provided, default to create
            let verbose = args.create.verbose;
            (scaffolder_core::run(&config, args.create.into()).await, verbose)
        }
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, verbose);
            ExitCode::FAILURE
        }
    }
}
