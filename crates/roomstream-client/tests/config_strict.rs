#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomstream_client::config;
use roomstream_client::config::schema::room_url;
use roomstream_core::protocol::FramingMode;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
stream:
  read_chunk_byts: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.stream.read_chunk_bytes, 10);
    assert_eq!(cfg.stream.framing, FramingMode::Brace);
    assert_eq!(cfg.auth.token_env, "GITTER");
    assert_eq!(cfg.api.rooms_url, "https://api.gitter.im/v1/rooms");
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
api:
  rooms_url: "http://localhost:9000/v1/rooms"
  chat_messages_url: "http://localhost:9000/v1/rooms/{room_id}/chatMessages"
  connect_timeout_ms: 5000
stream:
  chat_messages_url: "http://localhost:9001/v1/rooms/{room_id}/chatMessages"
  read_chunk_bytes: 4096
  max_span_bytes: 65536
  framing: string_aware
auth:
  token_env: "CHAT_TOKEN"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.stream.framing, FramingMode::StringAware);
    assert_eq!(cfg.stream_options().max_span_bytes, 65536);
    assert_eq!(
        room_url(&cfg.stream.chat_messages_url, "abc"),
        "http://localhost:9001/v1/rooms/abc/chatMessages"
    );
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nstream:\n  read_chunk_bytes: 0\n",
        "version: 1\nstream:\n  max_span_bytes: 10\n",
        "version: 1\napi:\n  chat_messages_url: \"https://api.example/rooms/messages\"\n",
        "version: 1\napi:\n  rooms_url: \"ftp://example/rooms\"\n",
        "version: 1\nstream:\n  framing: json\n",
        "version: 1\nauth:\n  token_env: \" \"\n",
    ];
    for c in cases {
        let err = config::load_from_str(c).expect_err(c);
        assert_eq!(err.code().as_str(), "CONFIG", "case={c}");
    }
}
