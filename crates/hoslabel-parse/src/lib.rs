pub mod entity;
pub mod lexicon;
pub mod normalize;
pub mod region;
pub mod scanner;
pub mod splitter;
pub mod subname;

pub use entity::Entity;
pub use lexicon::{Lexicon, ANCHOR, MIN_TITLE_LEN};
pub use normalize::normalize;

pub(crate) use entity::dedup_in_order;

/// Length in code points, the unit every title-length rule is stated in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
