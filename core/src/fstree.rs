//! In-memory snapshot of a directory tree.
//!
//! Nodes live in a flat arena owned by [`FsTree`]; parents own their children
//! top-down and refer back to them by [`NodeId`]. The tree is immutable once
//! built.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{GerpError, Result};

/// Handle to a node in an [`FsTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// One directory snapshot: its name, the plain files directly inside it, and
/// its subdirectories, both in filesystem-enumeration order.
#[derive(Debug)]
pub struct DirNode {
    name: String,
    files: Vec<String>,
    subdirs: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl DirNode {
    /// The root node carries the full path the tree was built from; every
    /// other node carries its basename.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn subdirs(&self) -> &[NodeId] {
        &self.subdirs
    }

    /// Non-owning back-reference; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirs.is_empty()
    }
}

/// Directory tree built from a recursive filesystem walk.
#[derive(Debug)]
pub struct FsTree {
    nodes: Vec<DirNode>,
}

impl FsTree {
    /// Walk `root` recursively and snapshot every directory beneath it.
    ///
    /// Hidden entries (leading dot) are skipped. Symlinks are never followed;
    /// they are logged and ignored. Fails with [`GerpError::NotFound`] when a
    /// directory cannot be enumerated and [`GerpError::InvalidEntry`] when an
    /// entry is neither a regular file nor a directory.
    pub fn build(root: impl AsRef<Path>) -> Result<FsTree> {
        let root = root.as_ref();
        let mut tree = FsTree { nodes: Vec::new() };
        tree.scan_dir(root, root.to_string_lossy().into_owned(), None)?;
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &DirNode {
        &self.nodes[id.0]
    }

    /// Total number of directories in the snapshot.
    pub fn dir_count(&self) -> usize {
        self.nodes.len()
    }

    fn scan_dir(&mut self, path: &Path, name: String, parent: Option<NodeId>) -> Result<NodeId> {
        let dir = fs::read_dir(path).map_err(|_| GerpError::NotFound {
            path: path.to_path_buf(),
        })?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(DirNode {
            name,
            files: Vec::new(),
            subdirs: Vec::new(),
            parent,
        });

        for entry in dir {
            let entry = entry?;
            let entry_name = entry.file_name().to_string_lossy().into_owned();
            if entry_name.starts_with('.') {
                continue;
            }
            let entry_path = entry.path();
            let file_type = entry.file_type().map_err(|_| GerpError::InvalidEntry {
                path: entry_path.clone(),
            })?;

            if file_type.is_dir() {
                let child = self.scan_dir(&entry_path, entry_name, Some(id))?;
                self.nodes[id.0].subdirs.push(child);
            } else if file_type.is_file() {
                self.nodes[id.0].files.push(entry_name);
            } else if file_type.is_symlink() {
                // Never dereferenced, even when the target is a directory.
                debug!(path = %entry_path.display(), "skipping symlink");
            } else {
                return Err(GerpError::InvalidEntry { path: entry_path });
            }
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn snapshots_files_and_subdirs() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/b.txt")).unwrap();

        let tree = FsTree::build(dir.path()).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.files(), ["a.txt"]);
        assert_eq!(root.subdirs().len(), 1);

        let sub = tree.node(root.subdirs()[0]);
        assert_eq!(sub.name(), "sub");
        assert_eq!(sub.files(), ["b.txt"]);
        assert_eq!(sub.parent(), Some(tree.root()));
    }

    #[test]
    fn root_keeps_full_path() {
        let dir = tempdir().unwrap();
        let tree = FsTree::build(dir.path()).unwrap();
        assert_eq!(tree.node(tree.root()).name(), dir.path().to_string_lossy());
        assert!(tree.node(tree.root()).is_empty());
    }

    #[test]
    fn skips_hidden_entries() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        File::create(dir.path().join("seen.txt")).unwrap();

        let tree = FsTree::build(dir.path()).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.files(), ["seen.txt"]);
        assert!(root.subdirs().is_empty());
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FsTree::build(&missing).unwrap_err();
        assert!(matches!(err, GerpError::NotFound { path } if path == missing));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_ignored() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("real.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let tree = FsTree::build(dir.path()).unwrap();
        assert_eq!(tree.node(tree.root()).files(), ["real.txt"]);
    }
}
