#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn lookup_knows_only_tagstr() {
    assert_eq!(lookup("tagstr"), Some(CodecInfo { name: "tagstr" }));
    assert_eq!(lookup("utf-8"), None);
}

#[test]
fn decode_rewrites_unconditionally() {
    let codec = lookup("tagstr").unwrap();
    let input = b"x = t @ f'{a}'\n";
    let (text, consumed) = codec.decode(input).unwrap();
    assert_eq!(text, "x = t ( (lambda:(a),'a',None,None), )");
    assert_eq!(consumed, input.len());
}

#[test]
fn decode_rejects_invalid_utf8() {
    let codec = lookup("tagstr").unwrap();
    assert!(matches!(codec.decode(b"x = '\xff'\n"), Err(CodecError::Utf8(_))));
}

#[test]
fn decode_strips_byte_order_mark() {
    let codec = lookup("tagstr").unwrap();
    assert_eq!(codec.decode(b"\xef\xbb\xbfx = 1\n").unwrap().0, "x = 1");
}

#[test]
fn encode_is_utf8() {
    let codec = lookup("tagstr").unwrap();
    assert_eq!(codec.encode("é"), ("é".as_bytes().to_vec(), 1));
}

#[test]
fn incremental_decoder_waits_for_the_final_chunk() {
    let mut decoder = lookup("tagstr").unwrap().incremental_decoder();
    assert_eq!(decoder.decode(b"x = t @ ", false).unwrap(), "");
    assert_eq!(decoder.decode(b"f'a'", false).unwrap(), "");
    assert_eq!(decoder.pending(), 12);
    assert_eq!(decoder.decode(b"\n", true).unwrap(), "x = t ( 'a', )");
    assert_eq!(decoder.pending(), 0);
}

#[test]
fn incremental_decoder_reset() {
    let mut decoder = IncrementalDecoder::default();
    decoder.decode(b"garbage @ (", false).unwrap();
    decoder.reset();
    assert_eq!(decoder.decode(b"y = 2\n", true).unwrap(), "y = 2");
}

#[test]
fn stream_reader() {
    let codec = lookup("tagstr").unwrap();
    let text = codec.read_to_string(&b"t @ f'x'\n"[..]).unwrap();
    assert_eq!(text, "t ( 'x', )");
}

#[test]
fn rewrite_errors_surface() {
    let codec = lookup("tagstr").unwrap();
    assert!(matches!(codec.decode(b"t @ (f'x' y)\n"), Err(CodecError::Transform(_))));
}
