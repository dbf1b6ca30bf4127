//! Path-data transforms for deriving wave masks.
//!
//! A path's `d` attribute is parsed into [`PathData`], flipped and mirrored
//! inside a [`ViewBox`], and written back out. [`enclose_above`] turns a wave
//! that fills the area below its curve into one that fills the area above it.
//!
//! None of the transforms fail: malformed input produces best-effort output.

mod error;
mod types;
mod parse;
mod transform;
mod enclose;
mod mask;

pub use error::ViewBoxError;
pub use types::{ArityMismatch, Command, Letter, PathData, Position, Slot, ViewBox, format_number};
pub use parse::{parse_numbers, parse_path};
pub use transform::{flip_vertical, invert, invert_path, mirror_reverse};
pub use enclose::{Enclosure, Repair, enclose_above};
pub use mask::{MaskPair, encode_uri, invert_document, mask_document, mask_url};
