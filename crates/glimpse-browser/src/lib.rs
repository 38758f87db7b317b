//! Glimpse page pipeline.
//!
//! A load runs leaf-first through the modules of this crate:
//!
//! 1. [`url`] tokenizes the address into a [`ParsedUrl`].
//! 2. [`loader`] fetches the body over HTTP(S), from disk, or from an
//!    inline `data` URL.
//! 3. [`lexer`] strips markup down to plain text.
//! 4. [`layout`] places every character on a fixed cell grid.
//! 5. [`viewport`] draws the slice of the display list that is on screen.
//!
//! [`browser::Browser`] ties the steps together and reacts to scroll input.

pub mod browser;
pub mod layout;
pub mod lexer;
pub mod loader;
pub mod url;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use browser::{Browser, EventOutcome};
pub use layout::{DisplayList, GlyphPlacement, layout};
pub use lexer::strip_markup;
pub use loader::Loader;
pub use url::{ParsedUrl, Scheme};
pub use viewport::Viewport;
