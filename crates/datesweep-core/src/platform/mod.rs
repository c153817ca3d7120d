//! Platform knowledge — OS-reserved locations and lexical path handling.

pub mod classifier;
pub mod paths;

pub use classifier::{is_system_sensitive, SYSTEM_EXTENSIONS, SYSTEM_PATH_PREFIXES};
pub use paths::{absolutize, normalize_lexically, rebase, relative_to, same_file, same_location};
