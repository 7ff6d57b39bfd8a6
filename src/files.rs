// ABOUTME: Recursive enumeration of the regular files under a deploy root.
// ABOUTME: Produces the on-disk path and the site path used as manifest key.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// One file to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFile {
    /// Where the bytes live on disk.
    pub local_path: PathBuf,
    /// `/`-rooted path of the file on the site, e.g. `/css/app.css`.
    pub site_path: String,
}

impl DeployFile {
    pub fn new(local_path: impl Into<PathBuf>, site_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            site_path: site_path.into(),
        }
    }
}

/// List every regular file below `root` in name order, a directory's own files
/// ahead of its subdirectories.
///
/// Symlinks are followed (the target's type decides), entries that are
/// neither files nor directories are skipped, and any path in `exclude` is
/// left out.
pub async fn enumerate_files(root: &Path, exclude: &[PathBuf]) -> std::io::Result<Vec<DeployFile>> {
    let mut excluded = HashSet::with_capacity(exclude.len());
    for path in exclude {
        let canonical = tokio::fs::canonicalize(path)
            .await
            .unwrap_or_else(|_| path.clone());
        excluded.insert(canonical);
    }

    let mut files = Vec::new();
    // Stack of directories still to visit; reversed so the first name pops first.
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();

        let mut subdirs = Vec::new();
        for path in entries {
            let metadata = tokio::fs::metadata(&path).await?;
            if metadata.is_dir() {
                subdirs.push(path);
            } else if metadata.is_file() {
                let canonical = tokio::fs::canonicalize(&path)
                    .await
                    .unwrap_or_else(|_| path.clone());
                if excluded.contains(&canonical) {
                    tracing::debug!(path = %path.display(), "excluded from deploy");
                    continue;
                }
                let Some(site_path) = site_path(root, &path) else {
                    tracing::warn!(path = %path.display(), "skipping file with non-UTF-8 name");
                    continue;
                };
                files.push(DeployFile::new(path, site_path));
            } else {
                tracing::warn!(path = %path.display(), "skipping non-regular file");
            }
        }
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(files)
}

/// The `/`-separated path of `path` relative to `root`, with a leading `/`.
///
/// `None` when a component is not valid UTF-8; such a name has no faithful
/// manifest key.
pub fn site_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut site = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            site.push('/');
            site.push_str(part.to_str()?);
        }
    }
    if site.is_empty() {
        site.push('/');
    }
    Some(site)
}
