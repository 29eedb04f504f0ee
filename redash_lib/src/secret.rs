//! Secret backends for reading the Redash API key.
//!
//! Used when `REDASH_APIKEY` is unset or empty. Each backend is configured
//! through environment variables, read via the lookup passed in so callers
//! can resolve against something other than the process environment.

use std::process::{Command, Stdio};

/// Environment lookup: variable name to value, `None` when unset.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn var(lookup: Lookup<'_>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Run a backend CLI and read the secret from stdout; stderr is discarded.
fn run_cmd(args: &[&str], env_extra: &[(&str, &str)]) -> Option<String> {
    let (bin, rest) = args.split_first()?;
    let mut cmd = Command::new(bin);
    cmd.args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in env_extra {
        cmd.env(k, v);
    }
    let out = cmd.output().ok()?;
    if !out.status.success() {
        tracing::debug!(backend = %bin, status = ?out.status.code(), "secret backend failed");
        return None;
    }
    String::from_utf8(out.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 1Password CLI (`op read`).
///
/// - `REDASH_OP_ENTRY_PATH`: `op://Vault/Item`, or `REDASH_OP_VAULT` + `REDASH_OP_ITEM`
/// - `REDASH_OP_FIELD`: field name, default `API_KEY`
pub fn one_password(lookup: Lookup<'_>) -> Option<String> {
    let field = lookup("REDASH_OP_FIELD").unwrap_or_else(|| "API_KEY".to_string());
    let field = field.trim();
    if field.is_empty() {
        return None;
    }

    let uri = match var(lookup, "REDASH_OP_ENTRY_PATH") {
        Some(path) => format!("{}/{}", path.trim_end_matches('/'), field),
        None => {
            let vault = var(lookup, "REDASH_OP_VAULT")?;
            let item = var(lookup, "REDASH_OP_ITEM")?;
            format!("op://{}/{}/{}", vault, item, field)
        }
    };
    run_cmd(&["op", "read", &uri], &[])
}

/// Bitwarden CLI (`bw get password`).
///
/// - `REDASH_BW_ITEM_ID`: login item UUID
/// - `REDASH_BW_SESSION`: optional session key, passed on as `BW_SESSION`
pub fn bitwarden(lookup: Lookup<'_>) -> Option<String> {
    let id = var(lookup, "REDASH_BW_ITEM_ID")?;
    match var(lookup, "REDASH_BW_SESSION") {
        Some(session) => run_cmd(
            &["bw", "get", "password", &id],
            &[("BW_SESSION", session.as_str())],
        ),
        None => run_cmd(&["bw", "get", "password", &id], &[]),
    }
}

/// KeePassXC CLI (`keepassxc-cli show`).
///
/// - `REDASH_KPXC_DB`: path to the .kdbx database
/// - `REDASH_KPXC_ENTRY`: entry title or path, e.g. "Web/Redash"
/// - `REDASH_KPXC_ATTRIBUTE`: attribute name, default `Password`
pub fn keepassxc(lookup: Lookup<'_>) -> Option<String> {
    let db = var(lookup, "REDASH_KPXC_DB")?;
    let entry = var(lookup, "REDASH_KPXC_ENTRY")?;
    let attr = lookup("REDASH_KPXC_ATTRIBUTE").unwrap_or_else(|| "Password".to_string());
    let attr = attr.trim();
    if attr.is_empty() {
        return None;
    }
    run_cmd(&["keepassxc-cli", "show", "-a", attr, &db, &entry], &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn one_password_not_configured() {
        assert!(one_password(&nothing).is_none());
    }

    #[test]
    fn one_password_blank_field_disables() {
        let lookup = |k: &str| match k {
            "REDASH_OP_FIELD" => Some("  ".to_string()),
            "REDASH_OP_ENTRY_PATH" => Some("op://Vault/Redash".to_string()),
            _ => None,
        };
        assert!(one_password(&lookup).is_none());
    }

    #[test]
    fn bitwarden_not_configured() {
        assert!(bitwarden(&nothing).is_none());
    }

    #[test]
    fn keepassxc_needs_db_and_entry() {
        let lookup = |k: &str| (k == "REDASH_KPXC_DB").then(|| "/tmp/none.kdbx".to_string());
        assert!(keepassxc(&lookup).is_none());
    }
}
