//! Build a searchable word index over a directory tree and answer
//! case-sensitive or case-insensitive word queries with file and line
//! context.
//!
//! The index is built once from a static directory snapshot and is read-only
//! afterward. Matches are reported as `path:line: text` lines written to a
//! caller-provided sink.
//!
//! ```no_run
//! use gerp_core::{Index, QueryMode, Result};
//!
//! fn main() -> Result<()> {
//!     let index = Index::new("./docs")?;
//!     let mut out = std::io::stdout();
//!     index.query("hello", &mut out, QueryMode::Insensitive)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fstree;
pub mod hashtable;
pub mod index;
pub mod tokenizer;

pub use error::{GerpError, Result};
pub use fstree::{DirNode, FsTree, NodeId};
pub use hashtable::Hashtable;
pub use index::{Index, Posting, QueryMode};
