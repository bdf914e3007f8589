//! Post-scaffold hooks: dependency install and git initialization

use crate::error::{CreateError, Result};
use crate::product::GitIdentity;
use crate::report::Notice;
use crate::runtime::check::{Capability, PackageManager};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Run `<package manager> install` in `target` with inherited stdio
pub async fn install(
    target: &Path,
    package_manager: PackageManager,
    binary: &Capability,
) -> Result<Vec<Notice>> {
    let mut notices = Vec::new();
    match binary {
        Capability::Present(_) => {}
        Capability::Absent => {
            return Err(CreateError::ToolNotFound(
                package_manager.binary().to_string(),
            ))
        }
        Capability::ProbeFailed(reason) => notices.push(Notice::warning(format!(
            "Could not check for {} ({}); trying anyway",
            package_manager, reason
        ))),
    }

    let status = TokioCommand::new(package_manager.binary())
        .arg("install")
        .current_dir(target)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| CreateError::io("run package manager in", target, e))?;

    if !status.success() {
        return Err(CreateError::HookFailed {
            command: format!("{} install", package_manager),
            code: status.code().unwrap_or(-1),
        });
    }

    notices.push(Notice::success("Installed dependencies"));
    Ok(notices)
}

/// Environment for the initial commit: product as author, user as committer
pub fn commit_env(
    identity: &GitIdentity,
    user_name: Option<String>,
    user_email: Option<String>,
) -> Vec<(&'static str, String)> {
    vec![
        (
            "GIT_COMMITTER_NAME",
            user_name.unwrap_or_else(|| identity.name.to_string()),
        ),
        (
            "GIT_COMMITTER_EMAIL",
            user_email.unwrap_or_else(|| identity.email.to_string()),
        ),
        ("GIT_AUTHOR_NAME", identity.name.to_string()),
        ("GIT_AUTHOR_EMAIL", identity.email.to_string()),
    ]
}

async fn git_config(key: &str) -> Option<String> {
    let output = TokioCommand::new("git")
        .args(["config", key])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

async fn git(
    target: &Path,
    args: &[&str],
    env: &[(&'static str, String)],
) -> std::io::Result<bool> {
    let output = TokioCommand::new("git")
        .args(args)
        .current_dir(target)
        .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
        .stdin(Stdio::null())
        .output()
        .await?;
    Ok(output.status.success())
}

/// Initialize a repository with everything committed
///
/// Never fails: a missing binary or a failing git step becomes a warning.
pub async fn init_git(
    target: &Path,
    git_binary: &Capability,
    identity: &GitIdentity,
) -> Vec<Notice> {
    match git_binary {
        Capability::Present(_) => {}
        Capability::Absent => {
            return vec![Notice::warning(
                "Could not locate `git` binary in `$PATH`. Skipping!",
            )]
        }
        Capability::ProbeFailed(reason) => {
            return vec![Notice::warning(format!(
                "Could not check for `git` ({}). Skipping!",
                reason
            ))]
        }
    }

    let env = commit_env(
        identity,
        git_config("user.name").await,
        git_config("user.email").await,
    );

    let steps: [&[&str]; 3] = [
        &["init"],
        &["add", "-A"],
        &["commit", "-m", identity.commit_message],
    ];
    for args in steps {
        match git(target, args, &env).await {
            Ok(true) => {}
            Ok(false) => {
                return vec![Notice::warning(format!(
                    "`git {}` failed; repository left partially initialized",
                    args.join(" ")
                ))]
            }
            Err(e) => {
                return vec![Notice::warning(format!(
                    "Could not run `git {}`: {}",
                    args.join(" "),
                    e
                ))]
            }
        }
    }

    vec![Notice::success("Initialized a git repository")]
}
