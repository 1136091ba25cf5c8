//! Key and label types

mod label;
mod sequence;

pub use label::Label;
pub use sequence::ByteSequence;
