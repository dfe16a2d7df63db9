//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [documents] Section Defaults
// ============================================================================

pub mod documents {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "src/main/latex".into()
    }

    pub fn common() -> String {
        "common".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "target".into()
    }

    pub fn workspace() -> PathBuf {
        "target/latex".into()
    }

    pub fn extra_runs() -> u32 {
        0
    }

    pub fn purge() -> Vec<String> {
        vec![".svn".into()]
    }
}

// ============================================================================
// [toolchain] Section Defaults
// ============================================================================

pub mod toolchain {
    use std::path::PathBuf;

    pub fn binaries_path() -> Option<PathBuf> {
        None
    }

    pub fn compiler() -> String {
        "pdflatex".into()
    }

    pub fn bibliography() -> String {
        "bibtex".into()
    }

    pub fn glossary() -> String {
        "makeglossaries".into()
    }
}
