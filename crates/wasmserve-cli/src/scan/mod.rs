//! Source discovery.
//!
//! [`scan`] walks a directory tree and returns every file with a given suffix,
//! skipping whole subtrees whose directory name is listed in an
//! [`ExclusionSet`].

mod exclusion;
mod scanner;

pub use exclusion::ExclusionSet;
pub use scanner::scan;
