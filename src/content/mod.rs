//! Turning shape-varying message content into readable text.
//!
//! Records arrive with whatever `content` the producer wrote: a bare string, a
//! `{ "content": ... }` document, an array of typed parts, or an assistant payload with a
//! top-level `text`. [`extract`] classifies the value once and renders it; it never fails.
//! Anything it cannot make sense of is shown as-is.

pub mod extractor;
pub mod preview;

pub use extractor::{ExtractMode, extract, extract_text, render_raw};
pub use preview::{PREVIEW_MAX_CHARS, PREVIEW_MAX_LINES, preview};
