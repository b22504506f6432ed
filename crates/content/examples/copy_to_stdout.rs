use micro_content::{Charset, ContentError, MediaTypeHeader, TextBody};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let body = match TextBody::builder()
        .payload("\u{4f1a}\u{5458}\u{670d}\u{52a1}\r\n")
        .encoding(Charset::Utf8)
        .header(MediaTypeHeader::new("text/plain").expect("static media type is valid"))
        .build()
    {
        Ok(body) => body,
        Err(e) => {
            error!(cause = %e, "failed to build body");
            return;
        }
    };

    match body.headers() {
        Ok(headers) => {
            for (name, value) in &headers {
                info!(%name, value = ?value, "entity header");
            }
        }
        Err(e) => error!(cause = %e, "invalid entity headers"),
    }

    let token = CancellationToken::new();
    let mut stdout = tokio::io::stdout();
    match body.copy_to_with_cancel(&mut stdout, &token).await {
        Ok(()) => info!(content_length = body.content_length(), "body written"),
        Err(ContentError::Cancelled) => info!("copy cancelled"),
        Err(e) => error!(cause = %e, "copy failed"),
    }

    if let Err(e) = stdout.shutdown().await {
        error!(cause = %e, "failed to shutdown stdout");
    }
}
