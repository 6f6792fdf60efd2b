//! Guess tree model, text codec and playback cursor.
//!
//! # File Format
//!
//! A tree is stored as one line per node in pre-order. The line index is the
//! node index; the root is line 0:
//!
//! ```text
//! <guess> <absent> <contains> <prefix> <suffix> <prefix-and-suffix>
//! ```
//!
//! Each child column holds the line index of that child or `-1` for an empty
//! slot. Children always appear after their parent.

pub mod codec;
mod cursor;
mod node;

pub use codec::CodecError;
pub use cursor::{Hint, TreeCursor};
pub use node::GuessNode;
pub(crate) use node::ParentLink;
