//! `[toolchain]` section configuration.
//!
//! Names and location of the external LaTeX programs.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[toolchain]` section in texmill.toml.
///
/// # Example
/// ```toml
/// [toolchain]
/// binaries_path = "/usr/local/texlive/2024/bin/x86_64-linux"
/// bibliography = "biber"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Directory holding the executables. Unset means look them up on `PATH`.
    #[serde(default = "defaults::toolchain::binaries_path")]
    #[educe(Default = defaults::toolchain::binaries_path())]
    pub binaries_path: Option<PathBuf>,

    /// Primary compiler.
    #[serde(default = "defaults::toolchain::compiler")]
    #[educe(Default = defaults::toolchain::compiler())]
    pub compiler: String,

    /// Bibliography tool (`bibtex`, `bibtex8`, `biber`, ...).
    #[serde(default = "defaults::toolchain::bibliography")]
    #[educe(Default = defaults::toolchain::bibliography())]
    pub bibliography: String,

    /// Glossary tool.
    #[serde(default = "defaults::toolchain::glossary")]
    #[educe(Default = defaults::toolchain::glossary())]
    pub glossary: String,
}

impl ToolchainConfig {
    /// Resolve an executable name against `binaries_path`.
    ///
    /// Without a binaries path (or with an empty one) the bare name is
    /// returned and left to the process launcher to find.
    pub fn executable(&self, name: &str) -> PathBuf {
        match self.binaries_path.as_deref() {
            Some(dir) if dir != Path::new("") => dir.join(name),
            _ => PathBuf::from(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ProjectConfig;
    use super::*;

    #[test]
    fn test_toolchain_config() {
        let config = r#"
            [toolchain]
            binaries_path = "/opt/texlive/bin"
            bibliography = "biber"
        "#;
        let config: ProjectConfig = toml::from_str(config).unwrap();

        assert_eq!(
            config.toolchain.binaries_path,
            Some(PathBuf::from("/opt/texlive/bin"))
        );
        assert_eq!(config.toolchain.compiler, "pdflatex");
        assert_eq!(config.toolchain.bibliography, "biber");
        assert_eq!(config.toolchain.glossary, "makeglossaries");
    }

    #[test]
    fn test_executable_bare_name() {
        let toolchain = ToolchainConfig::default();
        assert_eq!(toolchain.executable("pdflatex"), PathBuf::from("pdflatex"));
    }

    #[test]
    fn test_executable_empty_binaries_path() {
        let toolchain = ToolchainConfig {
            binaries_path: Some(PathBuf::new()),
            ..Default::default()
        };
        assert_eq!(toolchain.executable("bibtex"), PathBuf::from("bibtex"));
    }

    #[test]
    fn test_executable_with_binaries_path() {
        let toolchain = ToolchainConfig {
            binaries_path: Some(PathBuf::from("/opt/texlive/bin")),
            ..Default::default()
        };
        assert_eq!(
            toolchain.executable("makeglossaries"),
            PathBuf::from("/opt/texlive/bin/makeglossaries")
        );
    }
}
