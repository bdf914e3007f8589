//! Charm-style CLI prompts using cliclack

use super::reporter::TerminalReporter;
use crate::error::CreateError;
use crate::pipeline::{self, ScaffoldRequest};
use crate::product::ProductConfig;
use crate::report::Notice;
use crate::runtime::{Capabilities, PackageManager};
use crate::templates::reference::{default_app_name, resolve_destination};
use crate::templates::{
    ArchiveFetcher, ChoiceListing, ChoiceSource, TemplateChoice, TemplateRegistry,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Template reference (`name`, `org/repo`, `org/repo#tag`)
    pub template: Option<String>,

    /// Directory to create the app in
    pub dest: Option<String>,

    /// Application name (defaults to the destination's name)
    pub name: Option<String>,

    /// Directory to use instead of the current one
    pub cwd: Option<PathBuf>,

    /// Allow writing into an existing directory
    pub force: bool,

    /// Install dependencies (`None` = not given, defaults to yes)
    pub install: Option<bool>,

    /// Initialize a git repository (`None` = not given, defaults to yes)
    pub git: Option<bool>,

    /// Print full error chains
    pub verbose: bool,
}

/// A question the interactive flow may ask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    /// Pick a template (followed by a free-form reference for "Custom")
    Template,
    Destination,
    /// Asked only if the destination exists (or is not known yet)
    Overwrite,
    Name,
    Install,
    Git,
}

/// Which questions to ask, in order, for the given arguments
///
/// `destination_exists` is `None` while the destination is still to be
/// asked. Nothing is asked when both template and destination were supplied.
pub fn plan_questions(args: &CreateArgs, destination_exists: Option<bool>) -> Vec<Question> {
    if args.template.is_some() && args.dest.is_some() {
        return Vec::new();
    }

    let mut questions = Vec::new();
    if args.template.is_none() {
        questions.push(Question::Template);
    }
    if args.dest.is_none() {
        questions.push(Question::Destination);
    }
    if destination_exists != Some(false) {
        questions.push(Question::Overwrite);
    }
    if args.name.is_none() {
        questions.push(Question::Name);
    }
    if args.install.is_none() {
        questions.push(Question::Install);
    }
    if args.git.is_none() {
        questions.push(Question::Git);
    }
    questions
}

/// Answers gathered on top of the command-line arguments
#[derive(Debug, Clone, Default)]
struct Answers {
    args: CreateArgs,
    overwrite_confirmed: bool,
}

fn is_cancelled(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}

/// Prompt aborted with Esc or Ctrl-C
fn is_cancelled_prompt(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>().is_some_and(is_cancelled)
}

fn not_empty(input: &String) -> std::result::Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("A value is required")
    } else {
        Ok(())
    }
}

async fn ask<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    questions: &[Question],
    process_dir: &Path,
) -> Result<Answers> {
    let mut answers = Answers {
        args,
        overwrite_confirmed: false,
    };

    for question in questions {
        match question {
            Question::Template => {
                answers.args.template = Some(ask_template(config).await?);
            }
            Question::Destination => {
                let dest: String = cliclack::input("Directory to create the app")
                    .validate(not_empty)
                    .interact()?;
                answers.args.dest = Some(dest.trim().to_string());
            }
            Question::Overwrite => {
                let Some(dest) = &answers.args.dest else {
                    continue;
                };
                let target =
                    resolve_destination(process_dir, answers.args.cwd.as_deref(), Path::new(dest));
                if !target.is_dir() {
                    continue;
                }
                let overwrite: bool =
                    cliclack::confirm("The destination directory exists. Overwrite?")
                        .initial_value(false)
                        .interact()?;
                if !overwrite {
                    cliclack::log::warning("Aborting due to existing directory")?;
                    return Err(CreateError::DestinationExists(target).into());
                }
                answers.args.force = true;
                answers.overwrite_confirmed = true;
            }
            Question::Name => {
                let default = answers
                    .args
                    .dest
                    .as_deref()
                    .map(default_app_name)
                    .unwrap_or_default();
                let name: String = cliclack::input("The name of your application")
                    .default_input(&default)
                    .placeholder(&default)
                    .interact()?;
                answers.args.name = Some(name);
            }
            Question::Install => {
                let install: bool = cliclack::confirm("Install dependencies")
                    .initial_value(true)
                    .interact()?;
                answers.args.install = Some(install);
            }
            Question::Git => {
                let git: bool = cliclack::confirm("Initialize a `git` repository")
                    .initial_value(true)
                    .interact()?;
                answers.args.git = Some(git);
            }
        }
    }

    Ok(answers)
}

async fn ask_template<C: ProductConfig>(config: &C) -> io::Result<String> {
    let spinner = cliclack::spinner();
    spinner.start("Fetching official templates...");

    let listing = match TemplateRegistry::from_config(config) {
        Ok(registry) => registry.choices().await,
        Err(e) => {
            let mut choices = config.fallback_templates();
            choices.push(TemplateChoice::custom());
            ChoiceListing {
                choices,
                source: ChoiceSource::Fallback,
                notices: vec![Notice::warning(format!("{:#}", e))],
            }
        }
    };

    match listing.source {
        ChoiceSource::Registry => spinner.stop("Templates loaded"),
        ChoiceSource::Cache => spinner.stop("Registry unreachable, using cached templates"),
        ChoiceSource::Fallback => spinner.stop("Registry unreachable, using built-in templates"),
    }
    for notice in &listing.notices {
        cliclack::log::warning(&notice.message)?;
    }
    let choices = listing.choices;

    let mut select = cliclack::select("Pick a template").initial_value(0);
    for (idx, choice) in choices.iter().enumerate() {
        select = select.item(idx, &choice.title, &choice.description);
    }
    let selected_idx: usize = select.interact()?;

    match choices.get(selected_idx) {
        Some(choice) if choice.is_custom() => {
            let reference: String = cliclack::input("Remote template to clone (user/repo#tag)")
                .validate(not_empty)
                .interact()?;
            Ok(reference.trim().to_string())
        }
        Some(choice) => Ok(choice.value.clone()),
        None => Err(io::Error::new(io::ErrorKind::InvalidInput, "No template selected")),
    }
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<ArchiveFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            ArchiveFetcher::from_local(path.clone(), config.user_agent())
        }
        None => ArchiveFetcher::from_config(config)?,
    };

    Ok(fetcher)
}

/// Run the create command with interactive prompts where arguments are missing
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let process_dir = std::env::current_dir().context("Failed to read current directory")?;
    let capabilities = Capabilities::probe(PackageManager::from_env());

    // Step 1: Fill in whatever the command line left out
    let destination_exists = args
        .dest
        .as_deref()
        .map(|dest| {
            resolve_destination(&process_dir, args.cwd.as_deref(), Path::new(dest)).is_dir()
        });
    let questions = plan_questions(&args, destination_exists);
    let answers = match ask(config, args, &questions, &process_dir).await {
        Ok(answers) => answers,
        Err(e) if is_cancelled_prompt(&e) => {
            cliclack::outro_cancel("Aborting execution")?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let args = answers.args;

    let (Some(template), Some(dest)) = (args.template.as_deref(), args.dest.as_deref()) else {
        cliclack::log::warning("Insufficient arguments!")?;
        cliclack::outro("Alternatively, run `create --help` for usage info.")?;
        return Ok(());
    };

    // Step 2: Build the request
    let mut request = ScaffoldRequest::new(
        template,
        dest,
        args.name.as_deref(),
        &process_dir,
        args.cwd.as_deref(),
    );
    request.force = args.force;
    request.overwrite_confirmed = answers.overwrite_confirmed;
    request.install = args.install.unwrap_or(true);
    request.git = args.git.unwrap_or(true);
    request.verbose = args.verbose;

    // Step 3: Confirm --force on an existing directory
    if request.force && !request.overwrite_confirmed && request.target.is_dir() {
        let confirmed: bool = cliclack::confirm("You are using '--force'. Do you wish to continue?")
            .initial_value(false)
            .interact()
            .or_else(|e| if is_cancelled(&e) { Ok(false) } else { Err(e) })?;
        request.overwrite_confirmed = confirmed;
    }

    // Step 4: Create project
    let fetcher = setup_fetcher(config, &args.template_dir)?;
    let mut reporter = TerminalReporter::new();
    let outcome =
        match pipeline::create_project(config, &fetcher, &capabilities, &request, &mut reporter)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                reporter.fail();
                return Err(e.into());
            }
        };

    // Step 5: Show next steps
    print_next_steps(&outcome.next_steps)?;

    Ok(())
}

fn print_next_steps(steps: &[String]) -> Result<()> {
    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.green());
    }
    println!();

    cliclack::outro("Happy coding!")?;

    Ok(())
}

/// Print the official templates
pub async fn list<C: ProductConfig>(config: &C) -> Result<()> {
    let registry = TemplateRegistry::from_config(config)?;
    let repos = registry.list_official().await?;

    println!();
    println!("{}", "Available official templates:".blue());
    println!();
    for repo in repos {
        let description = repo
            .description
            .filter(|d| !d.is_empty())
            .map(|d| format!(" - {}", d))
            .unwrap_or_default();
        println!("  ⭐️  {}{}", repo.name.magenta().bold(), description);
    }
    println!();

    Ok(())
}
