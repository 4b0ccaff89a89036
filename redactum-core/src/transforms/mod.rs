//! Transform implementations shipped with the library.
//!
//! Each one fills in `fixed_replacement` on the spans it receives; none of
//! them changes span boundaries, so the merged ordering survives them.

pub mod kind_replacer;
pub mod prefix_suffix;
pub mod token_replacer;

pub use kind_replacer::KindReplacer;
pub use prefix_suffix::PrefixSuffixReplacer;
pub use token_replacer::{format_token, TokenReplacer};
