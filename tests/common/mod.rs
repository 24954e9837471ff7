// Shared helpers for integration tests.
//
// Provides a temporary directory of configuration fragments and a fluent
// builder so each integration test can set up an isolated evaluation
// without repeating filesystem boilerplate.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use nh_module::config::load_sources;
use nh_module::config::profiles::Profile;
use nh_module::evaluate::EvalInput;
use nh_module::platform::Platform;

/// Platform used by every test unless overridden.
pub const TEST_SYSTEM: &str = "aarch64-darwin";

/// An isolated set of fragment files backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding the fragments.
    pub root: tempfile::TempDir,
    /// Fragment paths in merge order.
    pub fragments: Vec<PathBuf>,
    /// Target profile.
    pub profile: Profile,
    /// Whether undeclared options are rejected.
    pub strict: bool,
}

impl IntegrationTestContext {
    /// Path of the temporary directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Load every fragment from disk and build the evaluation input.
    pub fn input(&self) -> EvalInput {
        EvalInput {
            profile: self.profile,
            platform: Platform::parse(TEST_SYSTEM).expect("parse platform"),
            strict: self.strict,
            sources: load_sources(&self.fragments).expect("load fragments"),
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a context for `profile` with no fragments.
    pub fn new(profile: Profile) -> Self {
        Self {
            ctx: IntegrationTestContext {
                root: tempfile::tempdir().expect("create temp dir"),
                fragments: Vec::new(),
                profile,
                strict: true,
            },
        }
    }

    /// Write `content` to `<name>` and append it to the merge order.
    pub fn with_fragment(mut self, name: &str, content: &str) -> Self {
        let path = self.ctx.root.path().join(name);
        std::fs::write(&path, content).expect("write fragment");
        self.ctx.fragments.push(path);
        self
    }

    /// Ignore undeclared options instead of failing.
    pub fn lenient(mut self) -> Self {
        self.ctx.strict = false;
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
