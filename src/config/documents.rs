//! `[documents]` section configuration.
//!
//! Where the document units live and which directory is shared by all of them.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[documents]` section in texmill.toml.
///
/// # Example
/// ```toml
/// [documents]
/// root = "docs"      # One sub-directory per document
/// common = "shared"  # Overlaid into every document's workspace
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Documents root; each immediate sub-directory is one document.
    #[serde(default = "defaults::documents::root")]
    #[educe(Default = defaults::documents::root())]
    pub root: PathBuf,

    /// Name of the reserved common directory inside the documents root.
    #[serde(default = "defaults::documents::common")]
    #[educe(Default = defaults::documents::common())]
    pub common: String,
}

impl DocumentsConfig {
    /// Path of the common resource tree (may not exist).
    pub fn common_dir(&self) -> PathBuf {
        self.root.join(&self.common)
    }
}
