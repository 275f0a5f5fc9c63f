//! Directory and file indexing.
//!
//! All walks share one ignore definition ([`filter::IgnoreSet`]).

pub mod dirs;
pub mod files;
pub mod filter;

pub use dirs::{find_dirs, DirectoryIndex};
pub use files::{
    enumerate_files, enumerate_files_blocking, extension_glob, files_in_dirs, files_in_dirs_blocking,
};
pub use filter::{FileFilter, IgnoreSet, SkipReason};
