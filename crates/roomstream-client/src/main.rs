//! roomstream terminal client.
//!
//! Usage: `roomstream <room_uri> [config.yaml]`
//! - Joins the room, prints every streamed message to stdout
//! - Sends each stdin line as a chat message
//! - Ctrl-C or stdin EOF cancels the subscription

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use roomstream_client::{config, join_consumer, ChannelSink, ClientConfig, HttpTransport, RoomSession};
use roomstream_core::protocol::ChatMessage;
use roomstream_core::RoomStreamError;

#[tokio::main]
async fn main() -> Result<(), RoomStreamError> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let room_uri = args
        .next()
        .ok_or_else(|| RoomStreamError::Config("usage: roomstream <room_uri> [config.yaml]".into()))?;
    let cfg = match args.next() {
        Some(path) => config::load_from_file(&path)?,
        None => ClientConfig::default(),
    };

    let token = std::env::var(&cfg.auth.token_env).map_err(|_| {
        RoomStreamError::Config(format!("{} env variable is missing", cfg.auth.token_env))
    })?;

    let transport = Arc::new(HttpTransport::new(&cfg, token)?);
    let session = Arc::new(
        RoomSession::new(transport, room_uri.as_str()).with_stream_options(cfg.stream_options()),
    );

    let room = session.join().await?;
    tracing::info!(room_uri = %room.uri, room_id = %room.id, "roomstream starting");

    let cancel = CancellationToken::new();
    let (mut sink, mut rx) = ChannelSink::channel(64);

    let printer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.parse_as::<ChatMessage>() {
                Ok(chat) => println!("{}", chat.display_line()),
                Err(_) => {
                    if let Some(text) = msg.text() {
                        println!("{text}");
                    }
                }
            }
        }
    });

    {
        let session = Arc::clone(&session);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = session.send(&line).await {
                    tracing::warn!(error = %e, code = e.code().as_str(), "send failed");
                }
            }
            cancel.cancel();
        });
    }

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("signal received, closing stream");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "failed to install Ctrl+C handler"),
            }
        });
    }

    let outcome = session.subscribe(&mut sink, &cancel).await;
    drop(sink);
    join_consumer(printer).await;

    match outcome {
        Ok(ended) => {
            tracing::info!(delivered = ended.delivered, skipped = ended.skipped, "stream closed by server");
            Ok(())
        }
        Err(RoomStreamError::Cancelled) => Ok(()),
        Err(e) => Err(e),
    }
}
