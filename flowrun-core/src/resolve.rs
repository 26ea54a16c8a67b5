//! Executable resolution for the flow CLI

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};

/// Script extension of the flow CLI when shipped as a Node.js script
pub const SCRIPT_EXTENSION: &str = "js";
/// Interpreter used for script-distributed CLIs
pub const SCRIPT_INTERPRETER: &str = "node";

/// Program plus any arguments that must precede the caller's argv
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: PathBuf,
    pub leading_args: Vec<OsString>,
}

impl ResolvedCommand {
    /// Human-readable command line for logs
    pub fn display_with(&self, args: &[String]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.leading_args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }
}

/// Resolve `cli_path` to something spawnable.
///
/// Scripts (`*.js`) go through the interpreter. Bare names are looked up on
/// PATH; anything containing a path separator is used as given and left for
/// the spawn itself to reject.
pub fn resolve_cli(cli_path: &str) -> Result<ResolvedCommand> {
    let path = Path::new(cli_path);

    if path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
        let interpreter =
            which::which(SCRIPT_INTERPRETER).unwrap_or_else(|_| PathBuf::from(SCRIPT_INTERPRETER));
        return Ok(ResolvedCommand {
            program: interpreter,
            leading_args: vec![OsString::from(cli_path)],
        });
    }

    if is_bare_name(path) {
        let program = which::which(cli_path).map_err(|_| FlowError::NotFound {
            program: cli_path.to_string(),
        })?;
        return Ok(ResolvedCommand {
            program,
            leading_args: Vec::new(),
        });
    }

    Ok(ResolvedCommand {
        program: path.to_path_buf(),
        leading_args: Vec::new(),
    })
}

fn is_bare_name(path: &Path) -> bool {
    !path.has_root() && path.components().count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_goes_through_interpreter() {
        let resolved = resolve_cli("/opt/najie/dist/cli.js").unwrap();
        assert_eq!(
            resolved.program.file_stem().and_then(|s| s.to_str()),
            Some(SCRIPT_INTERPRETER)
        );
        assert_eq!(resolved.leading_args, vec![OsString::from("/opt/najie/dist/cli.js")]);
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let resolved = resolve_cli("/usr/local/bin/najie-flow").unwrap();
        assert_eq!(resolved.program, PathBuf::from("/usr/local/bin/najie-flow"));
        assert!(resolved.leading_args.is_empty());
    }

    #[test]
    fn missing_bare_name_is_not_found() {
        let err = resolve_cli("najie-flow-definitely-not-installed").unwrap_err();
        assert!(matches!(err, FlowError::NotFound { .. }));
    }

    #[test]
    fn display_joins_all_parts() {
        let resolved = ResolvedCommand {
            program: PathBuf::from("node"),
            leading_args: vec![OsString::from("cli.js")],
        };
        assert_eq!(
            resolved.display_with(&["list".to_string()]),
            "node cli.js list"
        );
    }

    #[test]
    fn bare_name_detection() {
        assert!(is_bare_name(Path::new("najie-flow")));
        assert!(!is_bare_name(Path::new("./najie-flow")));
        assert!(!is_bare_name(Path::new("/bin/najie-flow")));
    }
}
