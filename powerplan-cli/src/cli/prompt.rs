//! Output file name prompt

use anyhow::{Context, Result};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};

/// Normalize a user-supplied output name.
///
/// Blank input gives `default`. A name already ending in `.{extension}`
/// (any case) is kept, anything else gets the extension appended.
pub fn normalize_output_name(input: &str, default: &str, extension: &str) -> String {
    let name = input.trim();
    if name.is_empty() {
        return default.to_string();
    }

    let has_extension = name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension));

    if has_extension {
        name.to_string()
    } else {
        format!("{}.{}", name, extension)
    }
}

/// Default output name with its extension forced to `extension`
pub fn default_output_name(default_file_name: &str, extension: &str) -> String {
    Path::new(default_file_name)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}

/// How the output path should be chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChoice<'a> {
    /// Path given on the command line
    Explicit(&'a Path),
    /// Use the default without asking
    Default,
    /// Ask on the terminal
    Prompt,
}

impl<'a> OutputChoice<'a> {
    pub fn decide(explicit: Option<&'a Path>, accept_default: bool, interactive: bool) -> Self {
        match explicit {
            Some(path) => OutputChoice::Explicit(path),
            None if accept_default || !interactive => OutputChoice::Default,
            None => OutputChoice::Prompt,
        }
    }
}

/// Resolve the output path, prompting when stdin is a terminal and nothing else decided it
pub fn resolve_output_path(
    explicit: Option<&Path>,
    accept_default: bool,
    default_file_name: &str,
    extension: &str,
) -> Result<PathBuf> {
    let default = default_output_name(default_file_name, extension);
    let interactive = std::io::stdin().is_terminal();

    let name = match OutputChoice::decide(explicit, accept_default, interactive) {
        OutputChoice::Explicit(path) => {
            normalize_output_name(&path.to_string_lossy(), &default, extension)
        }
        OutputChoice::Default => {
            log::info!("Using default output file name {}", default);
            default
        }
        OutputChoice::Prompt => {
            let answer: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter output file name")
                .default(default.clone())
                .allow_empty(true)
                .interact_text()
                .context("Failed to read output file name")?;
            normalize_output_name(&answer, &default, extension)
        }
    };

    Ok(PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_uses_default() {
        assert_eq!(normalize_output_name("", "output.xlsx", "xlsx"), "output.xlsx");
        assert_eq!(normalize_output_name("   ", "output.xlsx", "xlsx"), "output.xlsx");
    }

    #[test]
    fn test_extension_kept() {
        assert_eq!(normalize_output_name("plans.xlsx", "output.xlsx", "xlsx"), "plans.xlsx");
        assert_eq!(normalize_output_name("plans.XLSX", "output.xlsx", "xlsx"), "plans.XLSX");
    }

    #[test]
    fn test_extension_appended() {
        assert_eq!(normalize_output_name("plans", "output.xlsx", "xlsx"), "plans.xlsx");
        assert_eq!(normalize_output_name("plans.v2", "output.xlsx", "xlsx"), "plans.v2.xlsx");
        assert_eq!(normalize_output_name("plans.csv", "output.xlsx", "xlsx"), "plans.csv.xlsx");
        assert_eq!(normalize_output_name("plans", "output.csv", "csv"), "plans.csv");
    }

    #[test]
    fn test_default_output_name() {
        assert_eq!(default_output_name("output.xlsx", "xlsx"), "output.xlsx");
        assert_eq!(default_output_name("output.xlsx", "csv"), "output.csv");
        assert_eq!(default_output_name("output", "xlsx"), "output.xlsx");
    }

    #[test]
    fn test_output_choice() {
        let path = Path::new("x.xlsx");

        assert_eq!(OutputChoice::decide(Some(path), false, true), OutputChoice::Explicit(path));
        assert_eq!(OutputChoice::decide(None, true, true), OutputChoice::Default);
        assert_eq!(OutputChoice::decide(None, false, false), OutputChoice::Default);
        assert_eq!(OutputChoice::decide(None, false, true), OutputChoice::Prompt);
    }

    #[test]
    fn test_explicit_path_is_normalized() {
        let path = resolve_output_path(Some(Path::new("result")), false, "output.xlsx", "xlsx").unwrap();
        assert_eq!(path, PathBuf::from("result.xlsx"));
    }
}
