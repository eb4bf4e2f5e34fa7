//! Snapshot tests for human-readable CLI error formatting, where output
//! stability matters more than structural assertions.

use patchgraf_cli::error::CliError;

#[test]
fn usage_error_message() {
    let error = CliError::Usage("missing required flag --uid".to_string());
    insta::assert_snapshot!(error.to_string(), @"usage error: missing required flag --uid");
}

#[test]
fn patch_unreadable_message() {
    let error = CliError::PatchUnreadable {
        path: "missing.json".to_string(),
        detail: "expected value at line 1 column 1".to_string(),
    };
    insta::assert_snapshot!(
        error.to_string(),
        @"could not load patch from 'missing.json': expected value at line 1 column 1"
    );
}

#[test]
fn exit_codes_match_spec() {
    assert_eq!(CliError::Usage("x".to_string()).exit_code(), 2);
    assert_eq!(
        CliError::PatchUnreadable {
            path: "x".to_string(),
            detail: "y".to_string(),
        }
        .exit_code(),
        1
    );
}
