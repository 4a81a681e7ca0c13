//! Rewrites permissive JavaScript object-literal text into strict JSON
//! text.
//!
//! Accepts input that looks like a JS object or array literal (possibly
//! with single-quoted strings, unquoted identifier keys, trailing commas,
//! line/block comments, hexadecimal/octal/binary/underscore-separated
//! numerals, leading- or trailing-dot decimals, and barewords such as
//! `undefined` or `NaN`), and rewrites it into text a strict JSON decoder
//! can consume. A second mode rewrites an input that concatenates several
//! such documents back to back.
//!
//! # Examples
//!
//! Rewriting a single document:
//!
//! ```
//! let json = relaxson::transform(b"{a: 1, b: 'two',}").unwrap();
//! assert_eq!(json, b"{\"a\": 1, \"b\": \"two\"}");
//! ```
//!
//! Rewriting a sequence of concatenated documents lazily:
//!
//! ```
//! let docs: Vec<_> = relaxson::transform_documents(b"{a:1}{b:2}")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(docs, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
//! ```
//!
//! Driving the state machine by hand, for hosts that want to interleave
//! transformation with their own I/O loop:
//!
//! ```
//! use relaxson::{Status, Transformer};
//!
//! let mut t = Transformer::new(b"[1, 2, 3]");
//! while t.status() == Status::Advancing {
//!     t.advance();
//! }
//! assert_eq!(t.status(), Status::Finished);
//! ```

mod buffer;
mod error;
mod options;
mod reset;
mod stack;
mod state;
mod stream;
mod transformer;

pub use error::TransformError;
pub use options::{TransformerOptions, TransformerOptionsBuilder};
pub use reset::Reset;
pub use stack::ContainerKind;
pub use state::State;
pub use stream::DocumentStream;
pub use transformer::{Status, Transformer};

/// Rewrite a single permissive JS-object document into strict JSON text.
///
/// The returned bytes exclude the transformer's internal sentinel byte.
pub fn transform(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    Transformer::new(input).run()
}

/// Rewrite a single permissive JS-object document into strict JSON text,
/// using custom [`TransformerOptions`].
pub fn transform_with_options(
    input: &[u8],
    options: TransformerOptions,
) -> Result<Vec<u8>, TransformError> {
    Transformer::with_options(input, options).run()
}

/// Rewrite an input that concatenates several permissive JS-object
/// documents back to back, yielding each rewritten document lazily.
pub fn transform_documents(input: &[u8]) -> DocumentStream<'_> {
    DocumentStream::new(input)
}

/// Like [`transform_documents`], but with custom [`TransformerOptions`]
/// applied to every document in the sequence.
pub fn transform_documents_with_options(
    input: &[u8],
    options: TransformerOptions,
) -> DocumentStream<'_> {
    DocumentStream::with_options(input, options)
}
