//! Patch loading, mirroring `cli/utils.py::parse_patch` but reporting
//! failure instead of silently swallowing it.

use std::fs;

use patchgraf_core::Patch;

use crate::error::CliError;

/// Loads a [`Patch`] from `arg`: first as a file path, falling back to
/// treating `arg` itself as a literal JSON document.
///
/// # Errors
///
/// Returns [`CliError::PatchUnreadable`] if `arg` is neither a readable file
/// nor parseable JSON, or [`CliError::PatchMalformed`] if the JSON parses but
/// doesn't deserialize into patch operations.
pub fn load(arg: &str) -> Result<Patch, CliError> {
    let text = fs::read_to_string(arg).unwrap_or_else(|_| arg.to_string());

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| CliError::PatchUnreadable {
            path: arg.to_string(),
            detail: e.to_string(),
        })?;

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_patch_from_file() {
        let mut file = tempfile_with(r#"[{"op":"replace","path":"/a","value":1}]"#);
        let patch = load(file.path_str()).unwrap();
        assert_eq!(patch.len(), 1);
        file.cleanup();
    }

    #[test]
    fn loads_patch_from_literal_json() {
        let patch = load(r#"[{"op":"replace","path":"/a","value":1}]"#).unwrap();
        assert_eq!(patch.len(), 1);
    }

    #[test]
    fn reports_unreadable_and_unparseable_input() {
        assert!(matches!(
            load("not json and not a real path"),
            Err(CliError::PatchUnreadable { .. })
        ));
    }

    #[test]
    fn reports_malformed_patch_shape() {
        assert!(matches!(
            load(r#"{"op": "replace"}"#),
            Err(CliError::PatchMalformed(_))
        ));
    }

    struct TempFile {
        path: std::path::PathBuf,
    }

    impl TempFile {
        fn path_str(&self) -> &str {
            self.path.to_str().unwrap()
        }

        fn cleanup(self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn tempfile_with(contents: &str) -> TempFile {
        let mut path = std::env::temp_dir();
        path.push(format!("patchgraf-cli-test-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        TempFile { path }
    }
}
