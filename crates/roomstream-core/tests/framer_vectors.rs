//! Framing vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomstream_core::protocol::framer::{new_framer, FramingMode, DEFAULT_MAX_SPAN_BYTES};
use roomstream_core::protocol::message::decode_message;

mod vector_loader;
use vector_loader::load;

fn mode(name: Option<&str>) -> FramingMode {
    match name {
        None | Some("brace") => FramingMode::Brace,
        Some("string_aware") => FramingMode::StringAware,
        Some(other) => panic!("unknown framing: {other}"),
    }
}

#[test]
fn framer_vectors() {
    let files = [
        "two_chunks_two_objects.json",
        "object_split_across_chunks.json",
        "two_objects_one_chunk.json",
        "truncated_stream.json",
        "heartbeat_whitespace.json",
        "nested_objects.json",
        "ten_byte_reads.json",
        "invalid_utf8_span.json",
        "brace_in_string_aware.json",
        "brace_in_string_plain.json",
    ];

    for f in files {
        let v = load(f);
        let mut framer = new_framer(mode(v.framing.as_deref()), DEFAULT_MAX_SPAN_BYTES);

        let mut spans = Vec::new();
        for chunk in &v.chunks {
            if let Some(span) = framer.feed(&chunk.decode()).expect("feed failed") {
                spans.push(span);
            }
        }

        let expected: Vec<Vec<u8>> = v.expect_spans.iter().map(|s| s.decode()).collect();
        let got: Vec<Vec<u8>> = spans.iter().map(|s| s.to_vec()).collect();
        assert_eq!(got, expected, "vector={}", v.description);
        assert_eq!(framer.depth(), v.expect_depth, "vector={}", v.description);

        if !v.expect_decode_ok.is_empty() {
            let decoded: Vec<bool> = spans.iter().map(|s| decode_message(s).is_ok()).collect();
            assert_eq!(decoded, v.expect_decode_ok, "vector={}", v.description);
        }
    }
}

#[test]
fn every_split_point_yields_same_object() {
    let obj = br#"{"id":"5f","text":"hi {there}","fromUser":{"username":"ann"}}"#;
    for cut in 1..obj.len() {
        let mut framer = new_framer(FramingMode::StringAware, DEFAULT_MAX_SPAN_BYTES);
        assert!(framer.feed(&obj[..cut]).unwrap().is_none(), "cut={cut}");
        let span = framer.feed(&obj[cut..]).unwrap().expect("span");
        assert_eq!(&span[..], &obj[..], "cut={cut}");
    }
}
