//! Run output writers.
//!
//! One submodule, one format:
//!
//! - [`json`]: the optional end-of-run snapshot of every record inserted
//!   during the run
//!
//! # Output Structure
//!
//! ```text
//! snapshot_dir/
//! └── 2025-05-06/
//!     └── articles.json
//! ```

pub mod json;
