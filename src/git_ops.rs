//! Git audit trail for file-backed modules
//!
//! Every saved change of a module data file becomes one commit whose message
//! names the change ("Update billing #4"). Pushing happens once, on shutdown.

use anyhow::{Context, Result, anyhow};
use git2::{Oid, Repository, Signature, Time};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Committer used when the repository has no `user.name`/`user.email`
const FALLBACK_NAME: &str = "Admin Console";
const FALLBACK_EMAIL: &str = "admin-console@localhost";

/// The repository holding one data file
pub struct GitSync {
    repo: Mutex<Repository>,
    data_file: PathBuf,
}

impl GitSync {
    /// Find the repository containing `data_file`
    ///
    /// The file itself need not exist yet; discovery starts at its closest
    /// existing ancestor directory. Returns `None` outside a repository.
    pub fn discover(data_file: &Path) -> Option<Self> {
        let start = data_file.ancestors().skip(1).find(|dir| dir.is_dir())?;
        let repo = Repository::discover(start).ok()?;
        repo.workdir()?;
        Some(Self {
            repo: Mutex::new(repo),
            data_file: data_file.to_path_buf(),
        })
    }

    /// Stage the data file and commit it
    ///
    /// Returns the new commit id, or `None` when the file content matches the
    /// current HEAD tree.
    pub fn commit_change(&self, message: &str) -> Result<Option<Oid>> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| anyhow!("git repository lock poisoned"))?;
        let relative = path_in_workdir(&repo, &self.data_file)?;

        let mut index = repo.index()?;
        index
            .add_path(&relative)
            .with_context(|| format!("failed to stage '{}'", relative.display()))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit().context("HEAD is not a commit")?),
            Err(_) => None,
        };
        if parent.as_ref().is_some_and(|p| p.tree_id() == tree.id()) {
            debug!(file = %relative.display(), "data file unchanged, nothing to commit");
            return Ok(None);
        }

        let who = committer(&repo)?;
        let parents: Vec<_> = parent.iter().collect();
        let oid = repo.commit(Some("HEAD"), &who, &who, message, &tree, &parents)?;
        debug!(%oid, message, "committed data file");
        Ok(Some(oid))
    }

    /// Push the checked-out branch to `origin`
    pub fn push_current_branch(&self) -> Result<()> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| anyhow!("git repository lock poisoned"))?;

        let head = repo.head().context("repository has no HEAD to push")?;
        let branch = head.shorthand().context("HEAD is not a named branch")?;
        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);

        repo.find_remote("origin")
            .context("no 'origin' remote configured")?
            .push(&[refspec.as_str()], None)
            .with_context(|| format!("failed to push '{}' to origin", branch))
    }
}

/// Path of `file` relative to the repository working directory
fn path_in_workdir(repo: &Repository, file: &Path) -> Result<PathBuf> {
    let workdir = repo
        .workdir()
        .context("repository has no working directory")?;
    let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    let file = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
    file.strip_prefix(&workdir)
        .map(Path::to_path_buf)
        .with_context(|| format!("'{}' is outside '{}'", file.display(), workdir.display()))
}

fn committer(repo: &Repository) -> Result<Signature<'static>> {
    let config = repo.config()?;
    let name = config
        .get_string("user.name")
        .unwrap_or_else(|_| FALLBACK_NAME.to_string());
    let email = config
        .get_string("user.email")
        .unwrap_or_else(|_| FALLBACK_EMAIL.to_string());

    // Some CI sandboxes have no usable clock
    Signature::now(&name, &email).or_else(|_| {
        Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
            .context("failed to build a committer signature")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_user() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Console Tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();
        (dir, repo)
    }

    #[test]
    fn test_discover_outside_repository() {
        let dir = TempDir::new().unwrap();
        assert!(GitSync::discover(&dir.path().join("billing.toml")).is_none());
    }

    #[test]
    fn test_discover_before_file_exists() {
        let (dir, _repo) = repo_with_user();
        let data_file = dir.path().join("data").join("billing.toml");
        assert!(GitSync::discover(&data_file).is_some());
    }

    #[test]
    fn test_commit_change_skips_identical_content() {
        let (dir, repo) = repo_with_user();
        let data_file = dir.path().join("billing.toml");
        let sync = GitSync::discover(&data_file).unwrap();

        fs::write(&data_file, "format_version = 1\n").unwrap();
        let first = sync.commit_change("Create billing #1").unwrap().unwrap();
        let commit = repo.find_commit(first).unwrap();
        assert_eq!(commit.message(), Some("Create billing #1"));
        assert_eq!(commit.author().name(), Some("Console Tester"));

        assert!(sync.commit_change("Nothing changed").unwrap().is_none());

        fs::write(&data_file, "format_version = 1\n[[records]]\nid = 1\n").unwrap();
        let second = sync.commit_change("Update billing #1").unwrap().unwrap();
        assert_eq!(repo.find_commit(second).unwrap().parent_id(0).unwrap(), first);
    }

    #[test]
    fn test_push_without_origin_fails() {
        let (dir, _repo) = repo_with_user();
        let data_file = dir.path().join("billing.toml");
        fs::write(&data_file, "format_version = 1\n").unwrap();
        let sync = GitSync::discover(&data_file).unwrap();
        sync.commit_change("Create billing #1").unwrap();

        let err = sync.push_current_branch().unwrap_err();
        assert!(err.to_string().contains("origin"));
    }
}
