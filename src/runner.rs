// Runner module: the batch protocol of the posting tool. Scans the
// posts directory for pending files and walks each one through
// load -> eligibility check -> submit -> rename, strictly one at a time.
// The submit step is an injected closure, so everything here runs in
// tests without a network.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::post::{Post, READY_PREFIX};
use crate::scheduler::Submission;

/// What happened to one pending file during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service confirmed the post and the file was renamed.
    Scheduled {
        id: String,
        schedule_date: String,
        posted_as: String,
    },
    /// Metadata lacked an `image` key; no request was made and the file
    /// was left untouched.
    SkippedMissingImage,
    /// Load, submit, or rename failed; the file stays pending and the
    /// batch moves on.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub file_name: String,
    pub outcome: Outcome,
}

/// Aggregated result of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn scheduled(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Scheduled { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedMissingImage))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// List the pending post files (`READY_*.md`) in a directory. The order
/// is whatever the OS returns from the directory listing; callers must
/// not rely on it, and the downstream scheduling order is therefore
/// unspecified too.
pub fn scan_ready(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read posts directory {}", dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(READY_PREFIX) && name.ends_with(".md") {
            found.push(entry.path());
        }
    }
    Ok(found)
}

/// Run the submit-and-transition protocol over a list of pending files.
/// Each file is processed to completion before the next begins; a
/// failure is recorded and never aborts the rest of the batch.
pub fn process_files<F>(files: &[PathBuf], mut submit: F) -> BatchReport
where
    F: FnMut(&Post, &str) -> Result<Submission>,
{
    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let outcome = process_one(path, &mut submit);
        outcomes.push(FileOutcome { file_name, outcome });
    }
    BatchReport { outcomes }
}

/// Scan a directory and process everything pending in it.
pub fn process_batch<F>(dir: &Path, submit: F) -> Result<BatchReport>
where
    F: FnMut(&Post, &str) -> Result<Submission>,
{
    let files = scan_ready(dir)?;
    Ok(process_files(&files, submit))
}

fn process_one<F>(path: &Path, submit: &mut F) -> Outcome
where
    F: FnMut(&Post, &str) -> Result<Submission>,
{
    let post = match Post::load(path) {
        Ok(post) => post,
        Err(e) => return Outcome::Failed(format!("{:#}", e)),
    };
    // A post is only eligible once its metadata parsed and names an
    // image; anything else is a skip, not an error.
    let Some(image) = post.image().map(str::to_string) else {
        return Outcome::SkippedMissingImage;
    };

    match submit(&post, &image) {
        Ok(submission) => match post.mark_posted() {
            Ok(target) => Outcome::Scheduled {
                id: submission.id,
                schedule_date: submission.schedule_date,
                posted_as: target
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string(),
            },
            // The remote side accepted the post but the local state did
            // not advance; a re-run would submit it again. Surface the
            // remote id so the operator can check for the duplicate.
            Err(e) => Outcome::Failed(format!(
                "scheduled remotely as {} but {:#}",
                submission.id, e
            )),
        },
        Err(e) => Outcome::Failed(format!("{:#}", e)),
    }
}
