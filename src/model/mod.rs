//! Data model types.
//!
//! Input types ([`TextFragment`], [`FragmentStream`]) mirror the contract
//! of the external document parser; output types ([`Heading`], [`Outline`])
//! form the sole externally visible artifact per document.

mod fragment;
mod outline;

pub use fragment::{FragmentStream, TextFragment};
pub use outline::{Heading, HeadingLevel, Outline};
