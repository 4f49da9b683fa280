//! Illustrative leaf commands (SPEC_FULL.md §3.8). Each handler follows the
//! teacher's `tools::*::execute(args) -> Result<String>` shape, generalized
//! from JSON tool-call args to plain CLI args.
use crate::error::{Result, ToolboxError};

pub fn echo(args: &[String]) -> Result<String> {
    Ok(args.join(" "))
}

pub fn pwd() -> Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.display().to_string())
}

pub fn whoami() -> Result<String> {
    for var in ["USER", "USERNAME", "LOGNAME"] {
        if let Ok(name) = std::env::var(var) {
            if !name.is_empty() {
                return Ok(name);
            }
        }
    }
    Err(ToolboxError::Unsupported(
        "could not determine the current user from the environment".to_string(),
    ))
}

pub fn uname() -> Result<String> {
    Ok(format!("{} {}", std::env::consts::OS, std::env::consts::ARCH))
}

pub fn realpath(path: &str) -> Result<String> {
    let canonical = std::path::Path::new(path)
        .canonicalize()
        .map_err(|_| ToolboxError::NotFound(path.to_string()))?;
    Ok(canonical.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_joins_args_with_spaces() {
        assert_eq!(echo(&["hello".to_string(), "world".to_string()]).unwrap(), "hello world");
    }

    #[test]
    fn pwd_matches_current_dir() {
        assert_eq!(pwd().unwrap(), std::env::current_dir().unwrap().display().to_string());
    }

    #[test]
    fn realpath_rejects_missing_path() {
        assert!(realpath("/definitely/not/a/real/path/xyz").is_err());
    }

    #[test]
    fn realpath_resolves_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = realpath(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap().display().to_string());
    }
}
