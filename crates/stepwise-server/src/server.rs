//! Blocking HTTP loop serving one request at a time.

use std::io::Read;
use std::time::Instant;

use stepwise::Simplifier;
use tiny_http::{Header, Request, Response, Server};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::routes::{self, Reply};

/// Serves requests until the listener shuts down.
///
/// # Errors
///
/// Fails if the address cannot be bound.
pub fn serve(config: &ServerConfig, simplifier: &Simplifier) -> anyhow::Result<()> {
    let server = Server::http(&config.bind)
        .map_err(|error| anyhow::anyhow!("failed to bind {}: {error}", config.bind))?;
    info!(bind = %config.bind, "listening");

    for mut request in server.incoming_requests() {
        let started = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        let reply = match read_body(&mut request, config.max_body_bytes) {
            Ok(Some(body)) => routes::handle(&method, &url, &body, simplifier),
            Ok(None) => Reply::payload_too_large(config.max_body_bytes),
            Err(error) => {
                warn!(%error, "failed to read request body");
                continue;
            }
        };

        let status = reply.status;
        if let Err(error) = respond(request, &reply) {
            warn!(%error, "failed to send response");
        }
        info!(
            %method,
            url,
            status,
            elapsed_ms = started.elapsed().as_millis(),
            "request handled"
        );
    }
    Ok(())
}

/// Reads the body, or `None` if it is longer than `limit` bytes.
fn read_body(request: &mut Request, limit: usize) -> std::io::Result<Option<Vec<u8>>> {
    if request.body_length().is_some_and(|length| length > limit) {
        return Ok(None);
    }
    let mut body = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    request.as_reader().take(cap).read_to_end(&mut body)?;
    Ok((body.len() <= limit).then_some(body))
}

fn respond(request: Request, reply: &Reply) -> std::io::Result<()> {
    let mut response = Response::from_string(reply.body.to_string()).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    request.respond(response)
}
