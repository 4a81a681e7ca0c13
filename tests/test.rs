//! Scenario tests mirroring the documented rewrite rules, one function per
//! case.

use relaxson::{transform, transform_documents, TransformError};

/// Single quotes around both keys and string values become double quotes.
#[test]
fn single_quoted_object() {
    assert_eq!(transform(b"{'a': 'b'}").unwrap(), b"{\"a\": \"b\"}");
}

/// Unquoted identifier keys are quoted, and a trailing comma is dropped.
#[test]
fn unquoted_keys_and_trailing_comma() {
    assert_eq!(
        transform(b"{a: 1, b: 2,}").unwrap(),
        b"{\"a\": 1, \"b\": 2}"
    );
}

/// Hex, binary, octal, and underscore-grouped integers all normalize to
/// plain decimal text.
#[test]
fn numeral_grammar() {
    assert_eq!(
        transform(b"[0x10, 0b11, 0o17, 1_000]").unwrap(),
        b"[16, 3, 15, 1000]"
    );
}

/// Leading-dot and trailing-dot decimals gain the digit JSON requires, and
/// `undefined` is stringified since JSON has no such value.
#[test]
fn dot_decimals_and_undefined() {
    assert_eq!(
        transform(b"{x: .5, y: 1., z: undefined}").unwrap(),
        b"{\"x\": 0.5, \"y\": 1.0, \"z\": \"undefined\"}"
    );
}

/// An already-escaped double quote and an escaped single quote both survive
/// inside a double-quoted string value.
#[test]
fn mixed_quote_escaping() {
    assert_eq!(
        transform(br#"{s: "he said \"hi\" and 'bye'"}"#).unwrap(),
        br#"{"s": "he said \"hi\" and 'bye'"}"#
    );
}

/// Line and block comments are dropped entirely, wherever they appear.
#[test]
fn comments_produce_no_output() {
    assert_eq!(
        transform(b"/*c*/{a/*k*/:/*v*/1}//end").unwrap(),
        b"{\"a\":1}"
    );
}

/// Legacy JS octal (a leading `0` followed by octal digits, no `o`
/// separator) is also normalized.
#[test]
fn legacy_octal() {
    assert_eq!(transform(b"[017]").unwrap(), b"[15]");
}

/// `NaN` becomes the JSON string `"NaN"`, since JSON has no NaN literal.
#[test]
fn nan_becomes_string() {
    assert_eq!(transform(b"{n: NaN}").unwrap(), b"{\"n\": \"NaN\"}");
}

/// A negative number keeps its sign across every numeral form.
#[test]
fn negative_numbers() {
    assert_eq!(transform(b"[-5, -0x10, -.5]").unwrap(), b"[-5, -16, -0.5]");
}

/// A bareword value that isn't a recognized literal is wrapped as a JSON
/// string, brackets and all, stopping at the first unquoted structural
/// byte.
#[test]
fn unrecognized_bareword_value() {
    assert_eq!(
        transform(b"{a: Infinity}").unwrap(),
        b"{\"a\": \"Infinity\"}"
    );
}

/// A bareword spanning balanced brackets is wrapped whole, including the
/// inner brackets, since they don't close out the enclosing context.
#[test]
fn unrecognized_bareword_with_balanced_brackets() {
    assert_eq!(
        transform(b"{a: foo(bar)}").unwrap(),
        b"{\"a\": \"foo(bar)\"}"
    );
}

/// A digit-leading bareword key is quoted as a string rather than parsed as
/// a number, because key position always wins over numeral dispatch.
#[test]
fn digit_leading_key_is_quoted() {
    assert_eq!(transform(b"{1a: 2}").unwrap(), b"{\"1a\": 2}");
    assert_eq!(transform(b"{1: 2}").unwrap(), b"{\"1\": 2}");
}

/// An empty or bracket-less document closes cleanly with no output and no
/// error.
#[test]
fn malformed_opening_is_not_an_error() {
    assert_eq!(transform(b"   not an object").unwrap(), b"");
}

/// A stray `)` outside of a string or bareword token is a fatal, offset
/// carrying error.
#[test]
fn illegal_structural_byte() {
    let err = transform(b"{a: 1)}").unwrap_err();
    assert!(matches!(err, TransformError::IllegalStructuralByte { .. }));
}

/// An unterminated string is reported rather than silently truncated.
#[test]
fn unterminated_string_is_an_error() {
    let err = transform(b"{a: \"unterminated").unwrap_err();
    assert!(matches!(err, TransformError::UnterminatedString { .. }));
}

/// An unterminated bareword token at end-of-input is reported the same way.
#[test]
fn unterminated_token_is_an_error() {
    let err = transform(b"{a: foo(bar").unwrap_err();
    assert!(matches!(err, TransformError::UnterminatedToken { .. }));
}

/// Two objects concatenated back to back yield two documents in sequence.
#[test]
fn multi_document_objects() {
    let docs: Vec<_> = transform_documents(b"{\"a\":1}{\"b\":2}")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(docs, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
}

/// Two arrays concatenated back to back yield two documents in sequence.
#[test]
fn multi_document_arrays() {
    let docs: Vec<_> = transform_documents(b"[1][2,3]")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(docs, vec![b"[1]".to_vec(), b"[2,3]".to_vec()]);
}

/// Nested containers of mixed kind rewrite correctly, including a trailing
/// comma right before the outermost close.
#[test]
fn nested_mixed_containers() {
    assert_eq!(
        transform(b"{a: [1, {b: 2,}, 3],}").unwrap(),
        b"{\"a\": [1, {\"b\": 2}, 3]}"
    );
}

/// Backtick-quoted strings are accepted as a quote style, same as single
/// and double quotes.
#[test]
fn backtick_quoted_string() {
    assert_eq!(transform(b"{a: `hi`}").unwrap(), b"{\"a\": \"hi\"}");
}
