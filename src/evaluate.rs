//! One configuration evaluation: schema → merge → resolve → validate → render.
//!
//! The pipeline is a pure function of its [`EvalInput`]. It either returns a
//! complete [`Evaluation`] or fails before anything is rendered.
use serde::Serialize;

use crate::config::fragment::{self, HostFragment};
use crate::config::host::HostSettings;
use crate::config::profiles::Profile;
use crate::config::settings::Settings;
use crate::config::validation::{self, Diagnostic};
use crate::config::{self, Source};
use crate::error::NhModuleError;
use crate::platform::Platform;
use crate::render::{self, Rendered};

/// Everything an evaluation depends on.
#[derive(Debug, Clone)]
pub struct EvalInput {
    /// Target profile.
    pub profile: Profile,
    /// Host platform, used for package defaults.
    pub platform: Platform,
    /// Reject undeclared options instead of ignoring them.
    pub strict: bool,
    /// Fragments in merge order.
    pub sources: Vec<Source>,
}

/// Result of a successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Target profile.
    pub profile: Profile,
    /// Host platform identifier.
    pub platform: String,
    /// Resolved settings.
    pub settings: Settings,
    /// Resolved host settings.
    pub host: HostSettings,
    /// Advisory findings.
    pub warnings: Vec<Diagnostic>,
    /// Undeclared options dropped in lenient mode.
    pub ignored: Vec<String>,
    /// Rendered artifacts.
    pub rendered: Rendered,
}

/// Run the whole pipeline.
///
/// # Errors
///
/// Returns a schema or configuration error for malformed fragments and
/// [`EvalError::AssertionsFailed`](crate::error::EvalError::AssertionsFailed)
/// when validation fails; nothing is rendered in either case.
pub fn evaluate(input: &EvalInput) -> Result<Evaluation, NhModuleError> {
    let mut settings_fragments = Vec::with_capacity(input.sources.len());
    let mut host_fragment = HostFragment::default();
    let mut ignored = Vec::new();

    for source in &input.sources {
        let checked = config::check_source(input.profile, source, input.strict)?;
        tracing::debug!("checked fragment {}", checked.origin);
        ignored.extend(
            checked
                .ignored
                .into_iter()
                .map(|option| format!("{option} ({})", checked.origin)),
        );
        settings_fragments.push(checked.settings);
        host_fragment = host_fragment.merge(checked.host);
    }

    let merged = fragment::merge_all(settings_fragments);
    let settings = Settings::resolve(input.profile, merged, &input.platform);
    let host = HostSettings::resolve(host_fragment);

    let warnings = validation::validate_all(&settings, &host).into_result()?;
    let rendered = render::render_all(&settings, &host);

    Ok(Evaluation {
        profile: input.profile,
        platform: input.platform.to_string(),
        settings,
        host,
        warnings,
        ignored,
        rendered,
    })
}
