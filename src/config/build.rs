//! `[build]` section configuration.
//!
//! Output locations and the switches that steer a build run.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in texmill.toml - build run configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "target"              # <name>.pdf lands here
/// workspace = "target/latex"     # One staged copy per document
/// extra_runs = 1                 # Extra compiler passes for references
/// purge = [".svn", ".git"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Shared output directory receiving the final PDFs.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Root of the per-document build workspaces.
    #[serde(default = "defaults::build::workspace")]
    #[educe(Default = defaults::build::workspace())]
    pub workspace: PathBuf,

    /// Skip the whole build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub skip: bool,

    /// Rebuild every document regardless of timestamps.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub force: bool,

    /// Write placeholder PDFs instead of running the toolchain.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub dummy: bool,

    /// Remove the workspace root before staging.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Additional compiler passes after the mandatory ones.
    #[serde(default = "defaults::build::extra_runs")]
    #[educe(Default = defaults::build::extra_runs())]
    pub extra_runs: u32,

    /// Directory names deleted from every staged workspace.
    #[serde(default = "defaults::build::purge")]
    #[educe(Default = defaults::build::purge())]
    pub purge: Vec<String>,
}

impl BuildConfig {
    /// Final location of the PDF for document `name`.
    pub fn output_pdf(&self, name: &str) -> PathBuf {
        self.output.join(format!("{name}.pdf"))
    }
}
