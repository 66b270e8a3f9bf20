//! CLI surface for the SAGE binary
//!
//! Argument parsing plus report display and saving. All interactive plan
//! review lives in [`crate::hitl`].

/// Colored terminal output helpers.
pub mod output;

use crate::types::{FinalReport, Result};
use clap::Parser;
use output::Output;
use std::path::{Path, PathBuf};

/// A reflective research agent that creates comprehensive, edited reports.
#[derive(Debug, Parser)]
#[command(name = "sage", version, about, long_about = None)]
pub struct Cli {
    /// The research question (prompted interactively when omitted)
    pub question: Option<String>,

    /// Save the final report to this path (".md" appended when no extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the model name from configuration
    #[arg(long)]
    pub model: Option<String>,

    /// Approve the research plan without prompting
    #[arg(long)]
    pub auto_approve: bool,

    /// Execute research tasks concurrently instead of in plan order
    #[arg(long)]
    pub parallel: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Print the final report with a summary footer.
pub fn display_report(out: &Output, report: &FinalReport) {
    println!("\n{}", "=".repeat(60));
    println!("{}", report.content);
    println!("{}", "=".repeat(60));
    out.detail(&format!(
        "Report completed with {} revision(s), final score {}/10, {} source(s).",
        report.revisions,
        report.score,
        report.sources.len()
    ));
}

/// Write the report to disk, appending ".md" when the path has no extension.
pub fn save_report(report: &FinalReport, path: &Path) -> Result<PathBuf> {
    let path = if path.extension().is_none() {
        path.with_extension("md")
    } else {
        path.to_path_buf()
    };
    std::fs::write(&path, &report.content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinalReport;
    use chrono::Utc;

    fn report() -> FinalReport {
        FinalReport {
            title: "T".to_string(),
            content: "# T\n\nbody\n".to_string(),
            sources: vec![],
            revisions: 1,
            score: 8,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn save_report_appends_md_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&report(), &dir.path().join("out")).unwrap();
        assert_eq!(path.extension().unwrap(), "md");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# T\n\nbody\n");
    }

    #[test]
    fn save_report_keeps_existing_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&report(), &dir.path().join("out.txt")).unwrap();
        assert_eq!(path.extension().unwrap(), "txt");
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "sage",
            "what is rust?",
            "--auto-approve",
            "--parallel",
            "-o",
            "report.md",
        ]);
        assert_eq!(cli.question.as_deref(), Some("what is rust?"));
        assert!(cli.auto_approve);
        assert!(cli.parallel);
        assert_eq!(cli.output.as_deref(), Some(Path::new("report.md")));
    }
}
