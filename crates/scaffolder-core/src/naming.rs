//! Package name rules
//!
//! Mirrors the npm registry's naming rules. Structural rules are checked on
//! the name as typed; character-set and length rules are checked on the
//! package name that ends up in `package.json`.

use crate::error::NameViolations;

/// Longest name the registry accepts
pub const MAX_NAME_LENGTH: usize = 214;

const RESERVED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

const SPECIAL_CHARS: &[char] = &['~', '\'', '!', '(', ')', '*'];

/// Lower-case the name and collapse each whitespace run into one underscore
pub fn package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Check a proposed application name, collecting every rule it breaks
pub fn validate_name(name: &str) -> Result<(), NameViolations> {
    let mut reasons = Vec::new();

    if name.is_empty() {
        reasons.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        reasons.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        reasons.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        reasons.push("name cannot contain leading or trailing spaces".to_string());
    }

    let pkg = package_name(name.trim());

    for reserved in RESERVED_NAMES {
        if pkg == *reserved {
            reasons.push(format!("{} is a blacklisted name", reserved));
        }
    }
    if CORE_MODULES.contains(&pkg.as_str()) {
        reasons.push(format!("{} is a core module name", pkg));
    }
    if pkg.chars().count() > MAX_NAME_LENGTH {
        reasons.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if pkg.contains(SPECIAL_CHARS) {
        reasons.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }
    if !pkg.is_empty() && !is_url_friendly(&pkg) {
        reasons.push("name can only contain URL-friendly characters".to_string());
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(NameViolations {
            name: name.to_string(),
            reasons,
        })
    }
}

/// `@scope/name` or a bare name, each part surviving URI-component encoding
fn is_url_friendly(pkg: &str) -> bool {
    let parts: Vec<&str> = match pkg.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, rest)) => vec![scope, rest],
            None => return false,
        },
        None => vec![pkg],
    };

    parts.iter().all(|part| {
        !part.is_empty()
            && part.chars().all(|c| {
                c.is_ascii_alphanumeric()
                    || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
            })
    })
}
