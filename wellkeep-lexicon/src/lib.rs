// wellkeep-lexicon/src/lib.rs
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod fold;
pub mod lexicon;

pub use fold::{fold_case, FoldedText};
pub use lexicon::{KeywordMatch, Lexicon, LexiconError};
