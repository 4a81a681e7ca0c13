//! Lazily rewriting a sequence of back-to-back documents.

use crate::error::TransformError;
use crate::options::TransformerOptions;
use crate::transformer::{Status, Transformer};

/// An iterator that rewrites one concatenated-document input into a
/// sequence of strict JSON documents, one per `next()` call.
///
/// Each call drives the underlying [`Transformer`] until it completes a
/// document, yields the rewritten text with the sentinel stripped, then
/// resets the output buffer and keeps the cursor where it left off. The
/// iterator is fused: once a document comes back empty (no more openers
/// were found) or an error has been yielded, every subsequent call returns
/// `None`.
pub struct DocumentStream<'a> {
    transformer: Transformer<'a>,
    done: bool,
}

impl<'a> DocumentStream<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, TransformerOptions::default())
    }

    pub(crate) fn with_options(input: &'a [u8], options: TransformerOptions) -> Self {
        DocumentStream {
            transformer: Transformer::with_options(input, options),
            done: false,
        }
    }
}

impl<'a> Iterator for DocumentStream<'a> {
    type Item = Result<Vec<u8>, TransformError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.transformer.status() == Status::Advancing {
            self.transformer.advance();
        }
        match self.transformer.status() {
            Status::Finished => {
                let mut out = self.transformer.output_bytes();
                out.pop();
                if out.is_empty() {
                    // Opening found no `{`/`[` before end-of-input: no further document.
                    self.done = true;
                    return None;
                }
                self.transformer.reset_output();
                Some(Ok(out))
            }
            Status::Error => {
                self.done = true;
                Some(Err(self
                    .transformer
                    .take_error()
                    .expect("status is Error but no error was recorded")))
            }
            Status::Advancing => unreachable!("loop only exits once status leaves Advancing"),
        }
    }
}

impl std::iter::FusedIterator for DocumentStream<'_> {}

#[cfg(test)]
mod tests {
    use crate::transform_documents;

    #[test]
    fn two_objects_back_to_back() {
        let docs: Vec<_> = transform_documents(b"{\"a\":1}{\"b\":2}")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
    }

    #[test]
    fn two_arrays_back_to_back() {
        let docs: Vec<_> = transform_documents(b"[1][2,3]")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs, vec![b"[1]".to_vec(), b"[2,3]".to_vec()]);
    }

    #[test]
    fn stream_is_fused_after_completion() {
        let mut stream = transform_documents(b"{}");
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }
}
