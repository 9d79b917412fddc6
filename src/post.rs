// Post record module: a post is a markdown file whose lifecycle state is
// encoded in its filename prefix. `READY_` means pending, `POSTED_`
// means submitted; there are no other states.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::frontmatter;

/// Filename prefix of a post waiting to be scheduled.
pub const READY_PREFIX: &str = "READY_";

/// Filename prefix of a post that has been scheduled.
pub const POSTED_PREFIX: &str = "POSTED_";

/// Lifecycle state of a post, derived from its filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostState {
    Pending,
    Submitted,
}

impl PostState {
    /// Classify a filename by its prefix. Files with neither prefix are
    /// not posts and return `None`.
    pub fn of_file_name(name: &str) -> Option<PostState> {
        if name.starts_with(READY_PREFIX) {
            Some(PostState::Pending)
        } else if name.starts_with(POSTED_PREFIX) {
            Some(PostState::Submitted)
        } else {
            None
        }
    }
}

/// One pending or completed social post, loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub metadata: BTreeMap<String, String>,
    pub body: String,
    pub path: PathBuf,
}

impl Post {
    /// Read and parse a post file. Content without frontmatter loads
    /// fine with an empty metadata map; only I/O failures are errors.
    pub fn load(path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let (metadata, body) = frontmatter::parse(&content);
        Ok(Post {
            metadata,
            body,
            path: path.to_path_buf(),
        })
    }

    /// The image filename this post references, if any. A post without
    /// one is not eligible for submission.
    pub fn image(&self) -> Option<&str> {
        self.metadata.get("image").map(String::as_str)
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn state(&self) -> Option<PostState> {
        PostState::of_file_name(self.file_name())
    }

    /// Render this post back to file content.
    pub fn to_markdown(&self) -> String {
        frontmatter::render(&self.metadata, &self.body)
    }

    /// The single state transition: rename `READY_x.md` to `POSTED_x.md`
    /// in place. Refuses files that are not pending. The rename stays in
    /// the same directory, so it is atomic on POSIX and NTFS.
    pub fn mark_posted(&self) -> Result<PathBuf> {
        let name = self.file_name();
        if !name.starts_with(READY_PREFIX) {
            anyhow::bail!("{} is not a pending post", name);
        }
        let posted = name.replacen(READY_PREFIX, POSTED_PREFIX, 1);
        let target = self.path.with_file_name(&posted);
        fs::rename(&self.path, &target).with_context(|| {
            format!("Failed to rename {} to {}", self.path.display(), posted)
        })?;
        Ok(target)
    }
}
