//! Project configuration management for `texmill.toml`.
//!
//! # Sections
//!
//! | Section         | Purpose                                         |
//! |-----------------|-------------------------------------------------|
//! | `[documents]`   | Documents root and the shared common directory  |
//! | `[build]`       | Output paths, force/skip/dummy, extra passes    |
//! | `[toolchain]`   | LaTeX executables and where to find them        |
//!
//! # Example
//!
//! ```toml
//! [documents]
//! root = "src/main/latex"
//!
//! [build]
//! output = "target"
//! extra_runs = 1
//!
//! [toolchain]
//! bibliography = "biber"
//! ```
//!
//! The file is optional; every field has a default. CLI flags override the
//! file, and all paths are made absolute against the project root before the
//! build starts.

mod build;
pub mod defaults;
mod documents;
mod error;
mod toolchain;

pub use error::ConfigError;

use build::BuildConfig;
use documents::DocumentsConfig;
use toolchain::ToolchainConfig;

use crate::cli::{BuildArgs, Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing texmill.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root every relative path is resolved against
    #[serde(skip)]
    pub root: Option<PathBuf>,

    /// Document sources
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// External programs
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

impl ProjectConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Load the config file named by the CLI (defaults when it is missing),
    /// then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);

        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());

        if let Commands::Build { build_args } = &cli.command {
            self.update_with_build_args(build_args);
        }

        self.update_path_with_root(&root, &cli.config);
    }

    /// Apply `build` flags on top of the file values
    fn update_with_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.documents.root, args.docs.as_ref());
        Self::update_option(&mut self.build.output, args.output.as_ref());
        Self::update_option(&mut self.build.workspace, args.workspace.as_ref());
        Self::update_option(&mut self.build.force, args.force.as_ref());
        Self::update_option(&mut self.build.skip, args.skip.as_ref());
        Self::update_option(&mut self.build.dummy, args.dummy.as_ref());
        Self::update_option(&mut self.build.extra_runs, args.extra_runs.as_ref());
        Self::update_option(&mut self.toolchain.bibliography, args.bibliography.as_ref());

        if let Some(binaries) = &args.binaries {
            self.toolchain.binaries_path = Some(binaries.clone());
        }
        if args.clean {
            self.build.clean = true;
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));

        self.documents.root = Self::normalize_path(&root.join(&self.documents.root));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.workspace = Self::normalize_path(&root.join(&self.build.workspace));

        // Tilde expansion, then relative-to-root. An empty path stays empty
        // and means "search PATH".
        if let Some(binaries) = self.toolchain.binaries_path.take() {
            let expanded =
                PathBuf::from(shellexpand::tilde(&binaries.to_string_lossy()).into_owned());
            self.toolchain.binaries_path = Some(if expanded.as_os_str().is_empty() {
                expanded
            } else {
                Self::normalize_path(&root.join(expanded))
            });
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a build
    pub fn validate(&self) -> Result<()> {
        Self::check_plain_name("[documents.common]", &self.documents.common)?;

        for (field, tool) in [
            ("[toolchain.compiler]", &self.toolchain.compiler),
            ("[toolchain.bibliography]", &self.toolchain.bibliography),
            ("[toolchain.glossary]", &self.toolchain.glossary),
        ] {
            if tool.trim().is_empty() {
                bail!(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }

        for name in &self.build.purge {
            Self::check_plain_name("[build.purge]", name)?;
        }

        if self.build.workspace.starts_with(&self.documents.root) {
            bail!(ConfigError::Invalid(
                "[build.workspace] must not be inside [documents.root]".into()
            ));
        }

        Ok(())
    }

    /// A single path component: non-empty, no separators, not `.`/`..`
    fn check_plain_name(field: &str, name: &str) -> Result<()> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            bail!(ConfigError::Invalid(format!(
                "{field} must be a plain directory name, got `{name}`"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
