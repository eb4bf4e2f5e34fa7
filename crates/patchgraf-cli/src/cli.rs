//! Argument parsing, grounded in `migrafana/src/cli/main.py`'s three
//! subcommands (`dashboard`, `datasource`, `ls_datasources`) but using
//! `pico-args` instead of `click`.

use crate::error::CliError;

/// A fully parsed invocation.
#[derive(Debug, Clone)]
pub enum Command {
    /// `patchgraf dashboard --src <url> --patch <file> --uid <uid> [--dest <url>]`
    Dashboard(TargetArgs),
    /// `patchgraf datasource --src <url> --patch <file> --uid <uid> [--dest <url>]`
    Datasource(TargetArgs),
    /// `patchgraf ls-datasources --src <url>`
    ListDatasources {
        /// Source Grafana instance.
        src: String,
    },
}

impl Command {
    /// The `--src` URL this invocation authenticates against, for
    /// credential resolution.
    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            Command::Dashboard(target) | Command::Datasource(target) => &target.src,
            Command::ListDatasources { src } => src,
        }
    }
}

/// Shared flags for `dashboard` and `datasource`.
#[derive(Debug, Clone)]
pub struct TargetArgs {
    /// URL of the source Grafana instance.
    pub src: String,
    /// URL of the destination instance; defaults to `src` when absent.
    pub dest: String,
    /// Path (or literal JSON) of the patch to apply.
    pub patch: String,
    /// UID of the dashboard or datasource to patch.
    pub uid: String,
}

/// Parses `argv` (excluding the program name) into a [`Command`].
///
/// # Errors
///
/// Returns [`CliError::Usage`] if the subcommand is missing/unrecognised, or
/// a required flag is missing or malformed.
pub fn parse(mut args: pico_args::Arguments) -> Result<Command, CliError> {
    let subcommand = args
        .subcommand()
        .map_err(|e| CliError::Usage(e.to_string()))?
        .ok_or_else(|| {
            CliError::Usage("expected a subcommand: dashboard, datasource, ls-datasources".into())
        })?;

    let command = match subcommand.as_str() {
        "dashboard" => Command::Dashboard(parse_target_args(&mut args)?),
        "datasource" => Command::Datasource(parse_target_args(&mut args)?),
        "ls-datasources" => Command::ListDatasources {
            src: required(&mut args, "--src")?,
        },
        other => {
            return Err(CliError::Usage(format!(
                "unrecognised subcommand '{other}': expected dashboard, datasource, ls-datasources"
            )));
        }
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(CliError::Usage(format!(
            "unrecognised arguments: {remaining:?}"
        )));
    }

    Ok(command)
}

fn parse_target_args(args: &mut pico_args::Arguments) -> Result<TargetArgs, CliError> {
    let src = required(args, "--src")?;
    let dest = args
        .opt_value_from_str("--dest")
        .map_err(|e| CliError::Usage(e.to_string()))?
        .unwrap_or_else(|| src.clone());
    let patch = required(args, "--patch")?;
    let uid = required(args, "--uid")?;
    Ok(TargetArgs {
        src,
        dest,
        patch,
        uid,
    })
}

fn required(args: &mut pico_args::Arguments, flag: &'static str) -> Result<String, CliError> {
    args.value_from_str(flag)
        .map_err(|_| CliError::Usage(format!("missing required flag {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(raw.iter().map(Into::into).collect())
    }

    #[test]
    fn parses_dashboard_with_explicit_dest() {
        let command = parse(args(&[
            "dashboard",
            "--src",
            "https://a.example.com",
            "--dest",
            "https://b.example.com",
            "--patch",
            "patch.json",
            "--uid",
            "abc",
        ]))
        .unwrap();
        match command {
            Command::Dashboard(t) => {
                assert_eq!(t.src, "https://a.example.com");
                assert_eq!(t.dest, "https://b.example.com");
                assert_eq!(t.uid, "abc");
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn dest_defaults_to_src_when_omitted() {
        let command = parse(args(&[
            "datasource",
            "--src",
            "https://a.example.com",
            "--patch",
            "patch.json",
            "--uid",
            "abc",
        ]))
        .unwrap();
        match command {
            Command::Datasource(t) => assert_eq!(t.dest, "https://a.example.com"),
            _ => panic!("expected datasource command"),
        }
    }

    #[test]
    fn ls_datasources_needs_only_src() {
        let command = parse(args(&["ls-datasources", "--src", "https://a.example.com"])).unwrap();
        assert!(matches!(command, Command::ListDatasources { .. }));
    }

    #[test]
    fn missing_subcommand_is_usage_error() {
        assert!(matches!(
            parse(args(&[])).unwrap_err(),
            CliError::Usage(_)
        ));
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        assert!(matches!(
            parse(args(&["frobnicate"])).unwrap_err(),
            CliError::Usage(_)
        ));
    }

    #[test]
    fn missing_required_flag_is_usage_error() {
        assert!(matches!(
            parse(args(&["dashboard", "--src", "https://a.example.com"])).unwrap_err(),
            CliError::Usage(_)
        ));
    }

    #[test]
    fn src_reports_the_right_field_for_each_command() {
        let dashboard = parse(args(&[
            "dashboard",
            "--src",
            "https://a.example.com",
            "--patch",
            "p.json",
            "--uid",
            "u",
        ]))
        .unwrap();
        assert_eq!(dashboard.src(), "https://a.example.com");

        let ls = parse(args(&["ls-datasources", "--src", "https://b.example.com"])).unwrap();
        assert_eq!(ls.src(), "https://b.example.com");
    }
}
