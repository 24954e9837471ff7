//! `options`: print the option schema of a profile.
use std::fmt::Write as _;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, OptionsOpts};
use crate::config::profiles::Profile;
use crate::config::schema::{self, OptionDecl};

/// Run the options command.
///
/// # Errors
///
/// Returns an error if the output cannot be serialised or written.
pub fn run(global: &GlobalOpts, opts: &OptionsOpts) -> Result<()> {
    let decls = schema::declarations(global.profile);
    let text = if opts.json {
        serde_json::to_string_pretty(decls).context("serialising option schema")?
    } else {
        format_text(global.profile, decls)
    };
    super::emit(&text)
}

/// Human-readable listing of `decls`.
#[must_use]
pub fn format_text(profile: Profile, decls: &[OptionDecl]) -> String {
    let mut out = format!("Options of the {profile} profile:\n");
    for decl in decls {
        let _ = write!(
            out,
            "\n{}\n    type:    {}\n    default: {}\n    {}\n",
            decl.name,
            decl.kind.describe(),
            decl.default,
            decl.description,
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_every_option() {
        let text = format_text(Profile::Home, schema::declarations(Profile::Home));
        assert!(text.starts_with("Options of the home profile:"));
        for decl in schema::declarations(Profile::Home) {
            assert!(text.contains(decl.name), "missing {}", decl.name);
        }
        assert!(!text.contains("clean.enable"));
    }

    #[test]
    fn text_shows_type_and_default() {
        let text = format_text(Profile::System, schema::declarations(Profile::System));
        assert!(text.contains("clean.interval\n    type:    attribute set\n    default: { Weekday = 0 }"));
    }

    #[test]
    fn json_names_kinds_in_kebab_case() {
        let json = serde_json::to_value(schema::declarations(Profile::System)).unwrap();
        let extra = json
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["name"] == "clean.extraArgs")
            .unwrap();
        assert_eq!(extra["kind"], "single-line-str");
        assert_eq!(extra["merge"], "override");
    }
}
