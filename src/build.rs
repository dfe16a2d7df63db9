//! Build orchestration.
//!
//! # Architecture
//!
//! ```text
//! run()
//!     │
//!     ├── documents root missing / skip flag / no documents ──► Skipped
//!     │
//!     ├── stage_all()  ──► one workspace per document (all before any build)
//!     │
//!     └── for each staged document, in name order
//!             ├── dummy:  placeholder for the FIRST document, then stop
//!             ├── force or stale:  Toolchain::build()
//!             └── otherwise:  up to date (output PDF restored if deleted)
//! ```
//!
//! Documents are processed one at a time. A toolchain failure ends the run.

use crate::{
    config::ProjectConfig,
    debug,
    document::discover,
    driver::Toolchain,
    log, placeholder,
    stage::stage_all,
    staleness::needs_rebuild,
    utils::exec::ProcessRunner,
};
use anyhow::Result;
use std::fmt;

/// Why a run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The documents root does not exist.
    DocsRootMissing,
    /// `[build.skip]` was set.
    Requested,
    /// The documents root has no document directories.
    NoDocuments,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DocsRootMissing => "documents root does not exist",
            Self::Requested => "build skipped on request",
            Self::NoDocuments => "documents root contains no sub-directories",
        })
    }
}

/// What happened to each document of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents the toolchain ran for.
    pub built: Vec<String>,
    /// Documents whose PDF was already newer than every input.
    pub up_to_date: Vec<String>,
    /// Documents that received a placeholder PDF.
    pub placeholders: Vec<String>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Skipped(SkipReason),
    Completed(BuildReport),
}

/// Build every document under the documents root.
pub fn run<R: ProcessRunner>(config: &ProjectConfig, runner: &R) -> Result<BuildOutcome> {
    let docs_root = &config.documents.root;

    if !docs_root.exists() {
        log!("skip"; "directory '{}' does not exist", docs_root.display());
        return Ok(BuildOutcome::Skipped(SkipReason::DocsRootMissing));
    }
    if config.build.skip {
        log!("skip"; "build skipped");
        return Ok(BuildOutcome::Skipped(SkipReason::Requested));
    }

    let units = discover(docs_root, &config.documents.common)?;
    if units.is_empty() {
        log!("skip"; "directory '{}' contains no sub-directories", docs_root.display());
        return Ok(BuildOutcome::Skipped(SkipReason::NoDocuments));
    }

    let staged = stage_all(&units, config)?;
    let toolchain = Toolchain::new(config, runner);
    let mut report = BuildReport::default();

    for unit in &staged {
        let name = &unit.unit.name;

        if config.build.dummy {
            // Only the first document gets a placeholder
            if placeholder::synthesize(name, &config.build.output).is_some() {
                report.placeholders.push(name.clone());
            }
            break;
        }

        if config.build.force || needs_rebuild(&unit.workspace, &unit.pdf_file()) {
            toolchain.build(unit)?;
            report.built.push(name.clone());
        } else {
            log!("fresh"; "{} is up to date", name);
            if !config.build.output_pdf(name).is_file() {
                debug!("fresh"; "{} missing from output, copying it again", name);
                toolchain.publish(unit)?;
            }
            report.up_to_date.push(name.clone());
        }
    }

    Ok(BuildOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::BuildError, utils::exec::tests::FakeRunner};
    use std::{
        fs::{self, File},
        path::{Path, PathBuf},
        time::{Duration, SystemTime},
    };
    use tempfile::TempDir;

    struct Project {
        _dir: TempDir,
        root: PathBuf,
        config: ProjectConfig,
    }

    fn project() -> Project {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let mut config = ProjectConfig::default();
        config.set_root(&root);
        config.documents.root = root.join("src/main/latex");
        config.build.output = root.join("target");
        config.build.workspace = root.join("target/latex");
        Project {
            _dir: dir,
            root,
            config,
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
    }

    /// Fake toolchain whose compiler leaves `<name>.pdf` behind.
    fn compiler_for(names: &[&'static str]) -> FakeRunner {
        names.iter().fold(FakeRunner::new(), |runner, &name| {
            runner.on_run("pdflatex", move |dir| {
                if dir.ends_with(name) {
                    fs::write(dir.join(format!("{name}.pdf")), b"%PDF-1.5").unwrap();
                }
            })
        })
    }

    #[test]
    fn test_scenario_a_single_source() {
        let mut p = project();
        p.config.build.force = true;
        write(&p.config.documents.root.join("paper/paper.tex"), "\\begin{document}");
        let runner = compiler_for(&["paper"]);

        let outcome = run(&p.config, &runner).unwrap();

        assert_eq!(runner.programs(), vec!["pdflatex"]);
        assert!(p.root.join("target/paper.pdf").is_file());
        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected a completed build");
        };
        assert_eq!(report.built, vec!["paper"]);
    }

    #[test]
    fn test_scenario_b_with_bibliography() {
        let mut p = project();
        p.config.build.force = true;
        write(&p.config.documents.root.join("paper/paper.tex"), "\\cite{knuth}");
        write(&p.config.documents.root.join("paper/paper.bib"), "@book{knuth}");
        let runner = compiler_for(&["paper"]);

        run(&p.config, &runner).unwrap();

        assert_eq!(runner.programs(), vec!["pdflatex", "bibtex", "pdflatex"]);
        assert!(p.root.join("target/paper.pdf").is_file());
    }

    #[test]
    fn test_scenario_c_missing_documents_root() {
        let p = project();
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert_eq!(outcome, BuildOutcome::Skipped(SkipReason::DocsRootMissing));
        assert!(runner.programs().is_empty());
        assert!(!p.root.join("target").exists());
    }

    #[test]
    fn test_scenario_d_dummy_first_unit_only() {
        let mut p = project();
        p.config.build.dummy = true;
        write(&p.config.documents.root.join("thesis/thesis.tex"), "");
        write(&p.config.documents.root.join("article/article.tex"), "");
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert!(runner.programs().is_empty());
        let pdfs: Vec<_> = fs::read_dir(p.root.join("target"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "pdf"))
            .map(|e| e.file_name().into_string().unwrap())
            .collect();
        assert_eq!(pdfs, vec!["article.pdf"]);
        assert_eq!(
            fs::read_to_string(p.root.join("target/article.pdf")).unwrap(),
            placeholder::render("article")
        );
        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected a completed build");
        };
        assert_eq!(report.placeholders, vec!["article"]);
    }

    #[test]
    fn test_skip_flag() {
        let mut p = project();
        p.config.build.skip = true;
        write(&p.config.documents.root.join("paper/paper.tex"), "");
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert_eq!(outcome, BuildOutcome::Skipped(SkipReason::Requested));
        assert!(!p.config.build.workspace.exists());
    }

    #[test]
    fn test_no_documents() {
        let p = project();
        fs::create_dir_all(p.config.documents.root.join("common")).unwrap();
        fs::create_dir_all(p.config.documents.root.join(".svn")).unwrap();
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert_eq!(outcome, BuildOutcome::Skipped(SkipReason::NoDocuments));
    }

    #[test]
    fn test_up_to_date_document_is_skipped() {
        let p = project();
        let docs = &p.config.documents.root;
        let old = SystemTime::now() - Duration::from_secs(3600);
        write(&docs.join("paper/paper.tex"), "");
        set_mtime(&docs.join("paper/paper.tex"), old);
        // PDF from an earlier run, newer than the sources
        write(&p.config.build.workspace.join("paper/paper.pdf"), "%PDF");
        let runner = compiler_for(&["paper"]);

        let outcome = run(&p.config, &runner).unwrap();

        assert!(runner.programs().is_empty());
        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected a completed build");
        };
        assert_eq!(report.up_to_date, vec!["paper"]);
        assert!(report.built.is_empty());
    }

    #[test]
    fn test_up_to_date_document_restores_deleted_output() {
        let p = project();
        let docs = &p.config.documents.root;
        let old = SystemTime::now() - Duration::from_secs(3600);
        write(&docs.join("paper/paper.tex"), "");
        set_mtime(&docs.join("paper/paper.tex"), old);
        write(&p.config.build.workspace.join("paper/paper.pdf"), "%PDF previous");
        assert!(!p.root.join("target/paper.pdf").exists());
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert!(runner.programs().is_empty());
        assert_eq!(
            fs::read_to_string(p.root.join("target/paper.pdf")).unwrap(),
            "%PDF previous"
        );
        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected a completed build");
        };
        assert_eq!(report.up_to_date, vec!["paper"]);
    }

    #[test]
    fn test_dummy_write_failure_is_not_reported() {
        let mut p = project();
        p.config.build.dummy = true;
        p.config.build.workspace = p.root.join("work");
        write(&p.config.documents.root.join("paper/paper.tex"), "");
        // A regular file where the output directory should be
        fs::write(&p.config.build.output, "").unwrap();
        let runner = FakeRunner::new();

        let outcome = run(&p.config, &runner).unwrap();

        assert!(runner.programs().is_empty());
        assert!(!p.root.join("target/paper.pdf").exists());
        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected a completed build");
        };
        assert!(report.placeholders.is_empty());
    }

    #[test]
    fn test_changed_source_rebuilds() {
        let p = project();
        let docs = &p.config.documents.root;
        let old = SystemTime::now() - Duration::from_secs(3600);
        write(&docs.join("paper/paper.tex"), "");
        write(&p.config.build.workspace.join("paper/paper.pdf"), "%PDF");
        set_mtime(&p.config.build.workspace.join("paper/paper.pdf"), old);
        let runner = compiler_for(&["paper"]);

        run(&p.config, &runner).unwrap();

        assert_eq!(runner.programs(), vec!["pdflatex"]);
    }

    #[test]
    fn test_common_tree_reaches_every_workspace() {
        let mut p = project();
        p.config.build.force = true;
        let docs = p.config.documents.root.clone();
        write(&docs.join("common/preamble.tex"), "shared");
        write(&docs.join("paper/paper.tex"), "");
        write(&docs.join("slides/slides.tex"), "");
        let runner = compiler_for(&["paper", "slides"]);

        run(&p.config, &runner).unwrap();

        for name in ["paper", "slides"] {
            let ws = p.config.build.workspace.join(name);
            assert_eq!(fs::read_to_string(ws.join("preamble.tex")).unwrap(), "shared");
            assert!(p.root.join(format!("target/{name}.pdf")).is_file());
        }
        assert!(!p.config.build.workspace.join("common").exists());
    }

    #[test]
    fn test_failure_aborts_remaining_documents() {
        let mut p = project();
        p.config.build.force = true;
        let docs = p.config.documents.root.clone();
        write(&docs.join("article/article.tex"), "");
        write(&docs.join("thesis/thesis.tex"), "");
        let runner = FakeRunner::new().exit_with("pdflatex", 1);

        let err = run(&p.config, &runner).unwrap_err();

        assert_eq!(runner.programs(), vec!["pdflatex"]);
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ToolFailed { .. })
        ));
        // Both documents were staged before the failure
        assert!(p.config.build.workspace.join("thesis/thesis.tex").exists());
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::NoDocuments.to_string(),
            "documents root contains no sub-directories"
        );
    }
}
