//! The index proper: builds postings over every file beneath a root
//! directory, then answers word queries against them.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{GerpError, Result};
use crate::fstree::{FsTree, NodeId};
use crate::hashtable::Hashtable;
use crate::tokenizer::{clean, lower, words};

/// Whether a query must match the verbatim word exactly, or any casing of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Sensitive,
    Insensitive,
}

/// One recorded occurrence of a word: the verbatim text, its 1-based line
/// number, the byte offset where that line starts, and the file it came from.
/// Immutable once created.
#[derive(Debug, Clone)]
pub struct Posting {
    word: String,
    lineno: u32,
    offset: u64,
    fileno: usize,
}

impl Posting {
    /// Original-case text as it appeared in the source file.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn lineno(&self) -> u32 {
        self.lineno
    }

    /// Byte offset of the start of the posting's line, the seek target for
    /// query-time re-display.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Index into the file table of the [`Index`] that produced this posting.
    pub fn fileno(&self) -> usize {
        self.fileno
    }
}

/// Searchable index over every file beneath a directory root.
///
/// Built once, all-or-nothing; read-only afterward. Postings are keyed by the
/// lowercased word, so one lookup serves both query modes.
#[derive(Debug)]
pub struct Index {
    entries: Hashtable<Vec<Posting>>,
    files: Vec<PathBuf>,
}

impl Index {
    /// Build the full index over `root`.
    ///
    /// Any scan or file-open failure aborts construction; the error is
    /// wrapped in [`GerpError::Build`] and no partial index survives.
    pub fn new(root: impl AsRef<Path>) -> Result<Index> {
        let root = root.as_ref();
        let mut index = Index {
            entries: Hashtable::new(),
            files: Vec::new(),
        };
        index.build(root).map_err(GerpError::into_build)?;
        info!(
            files = index.files.len(),
            keys = index.entries.len(),
            "index built"
        );
        Ok(index)
    }

    /// Number of files folded into the index.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct normalized keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Postings stored under a normalized (lowercase) key, in discovery
    /// order.
    pub fn postings(&self, key: &str) -> Option<&[Posting]> {
        self.entries.find(key).map(Vec::as_slice)
    }

    /// Path of the file a posting of this index refers to.
    pub fn path_of(&self, posting: &Posting) -> &Path {
        &self.files[posting.fileno]
    }

    /// Run a query and write formatted matches to `out`.
    ///
    /// The query is cleaned the same way build-time words are; lookup misses
    /// become a `Not Found` message rather than an error (Sensitive-mode
    /// misses add a hint to retry insensitively). The sink is flushed before
    /// returning. Only sink I/O errors and a failure to re-open an indexed
    /// file propagate.
    pub fn query(&self, to_query: &str, out: &mut impl Write, mode: QueryMode) -> Result<()> {
        let cleaned = clean(to_query);
        let key = lower(cleaned);

        let reported = match self.entries.find(&key) {
            Some(list) => self.report_matches(list, out, cleaned, mode)?,
            None => false,
        };

        if !reported {
            write!(out, "{cleaned} Not Found.")?;
            if mode == QueryMode::Sensitive {
                write!(out, " Try with @insensitive or @i.")?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    fn build(&mut self, root: &Path) -> Result<()> {
        let tree = FsTree::build(root)?;
        self.index_node(&tree, tree.root(), root)
    }

    /// Depth-first walk: all subdirectories before any files at each level.
    /// Order only affects file-table ordering, not correctness.
    fn index_node(&mut self, tree: &FsTree, id: NodeId, dir: &Path) -> Result<()> {
        let node = tree.node(id);
        for &sub in node.subdirs() {
            let sub_dir = dir.join(tree.node(sub).name());
            self.index_node(tree, sub, &sub_dir)?;
        }
        for file in node.files() {
            self.parse_file(&dir.join(file))?;
        }
        Ok(())
    }

    /// Tokenize every line of `path` into the table. Lines are read as raw
    /// bytes and interpreted as lossy UTF-8 so non-text files cannot abort
    /// the build.
    fn parse_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|err| GerpError::FileOpen {
            path: path.to_path_buf(),
            source: err,
        })?;
        let mut reader = BufReader::new(file);

        let fileno = self.files.len();
        let mut raw = Vec::new();
        let mut offset: u64 = 0;
        let mut lineno: u32 = 0;

        loop {
            raw.clear();
            let read = reader.read_until(b'\n', &mut raw)?;
            if read == 0 {
                break;
            }
            lineno += 1;

            let line = String::from_utf8_lossy(&raw);
            for word in words(&line) {
                let key = lower(word);
                let list = self.entries.get_or_default(&key);
                if should_add(list, word, lineno, fileno) {
                    list.push(Posting {
                        word: word.to_owned(),
                        lineno,
                        offset,
                        fileno,
                    });
                }
            }
            offset += read as u64;
        }

        debug!(path = %path.display(), lines = lineno, "indexed file");
        self.files.push(path.to_path_buf());
        Ok(())
    }

    /// Re-read each matching posting's line from its source file and emit
    /// `path:lineno: text`. Returns whether anything was emitted.
    fn report_matches(
        &self,
        list: &[Posting],
        out: &mut impl Write,
        query: &str,
        mode: QueryMode,
    ) -> Result<bool> {
        let mut reported: HashSet<(usize, u32)> = HashSet::new();
        let mut open: Option<(usize, BufReader<File>)> = None;
        let mut raw = Vec::new();

        for posting in list {
            if mode == QueryMode::Sensitive && posting.word != query {
                continue;
            }
            // Insensitive queries can hold several postings for one line
            // (case variants); report each (file, line) pair once.
            if !reported.insert((posting.fileno, posting.lineno)) {
                continue;
            }

            // Swap in a new handle only when the file changes; reopening per
            // posting is orders of magnitude slower on long posting lists.
            let same_file = matches!(open, Some((fileno, _)) if fileno == posting.fileno);
            if !same_file {
                let path = &self.files[posting.fileno];
                let file = File::open(path).map_err(|err| GerpError::FileOpen {
                    path: path.clone(),
                    source: err,
                })?;
                open = Some((posting.fileno, BufReader::new(file)));
            }

            if let Some((_, reader)) = open.as_mut() {
                reader.seek(SeekFrom::Start(posting.offset))?;
                raw.clear();
                reader.read_until(b'\n', &mut raw)?;
                let line = String::from_utf8_lossy(&raw);
                let line = line.strip_suffix('\n').unwrap_or(&line);
                writeln!(
                    out,
                    "{}:{}: {}",
                    self.files[posting.fileno].display(),
                    posting.lineno,
                    line
                )?;
            }
        }

        Ok(!reported.is_empty())
    }
}

/// Whether an identical verbatim word was already recorded for the same
/// (file, line) pair. Same-line postings sit contiguously at the tail of the
/// list, so the backward scan stops at the first posting from an earlier line
/// or file.
fn should_add(list: &[Posting], word: &str, lineno: u32, fileno: usize) -> bool {
    for posting in list.iter().rev() {
        if posting.lineno != lineno || posting.fileno != fileno {
            break;
        }
        if posting.word == word {
            return false;
        }
    }
    true
}
