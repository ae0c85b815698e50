//! The file module provides the engine's file system operations.
//!
//! ## Architecture
//!
//! ### resolver.rs
//! Maps project names to their root directories and confines caller supplied
//! relative paths to that root (no absolute paths, no `..`).
//!
//! ### access.rs
//! Low-level file access for one project root. Every mutating operation goes
//! through `FileAccessManager` so path confinement is applied once.
//!
//! ### category.rs / ignore.rs
//! Static tables: extension to category classification, and the fixed list
//! of build/dependency/version-control directories skipped by searches.
//!
//! ### tree.rs
//! Depth-bounded, best-effort snapshot of a project's directory tree.
//!
//! ### search/
//! Candidate selection and line-by-line content search.
//!
//! ### modify/
//! Search-and-replace with backups, and bulk copy/move/delete/duplicate/rename.
//!
//! ### batch.rs
//! Per-file outcome accumulator shared by every batch operation. A failure
//! on one file is recorded there and never aborts the batch.
//!
//! ### diff.rs
//! Line-indexed comparison of two files, plus a unified patch for display.

pub mod access;
pub mod batch;
pub mod category;
pub mod diff;
pub mod ignore;
pub mod modify;
pub mod resolver;
pub mod search;
pub mod tree;
