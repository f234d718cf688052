//! Request routing, independent of the socket.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Deserialize;
use serde_json::{json, Value};
use stepwise::{solve_latex, Error, Simplifier, Solution};
use tiny_http::Method;
use tracing::{debug, error, warn};

/// Body of `POST /solve`.
#[derive(Debug, Deserialize)]
struct SolveRequest {
    latex: String,
}

/// Status code and JSON body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self::new(status, json!({ "detail": detail.into() }))
    }

    /// Reply for a body over the configured limit.
    pub fn payload_too_large(limit: usize) -> Self {
        Self::detail(413, format!("Request body exceeds {limit} bytes"))
    }
}

/// Dispatches one request.
pub fn handle(method: &Method, url: &str, body: &[u8], simplifier: &Simplifier) -> Reply {
    let path = url.split('?').next().unwrap_or_default();
    match (path, method) {
        ("/solve", Method::Post) => solve(body, simplifier),
        ("/health", Method::Get) => Reply::new(200, json!({ "status": "ok" })),
        ("/solve" | "/health", _) => Reply::detail(405, "Method Not Allowed"),
        _ => Reply::detail(404, "Not Found"),
    }
}

fn solve(body: &[u8], simplifier: &Simplifier) -> Reply {
    let request: SolveRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(error) => {
            debug!(%error, "rejected request body");
            return Reply::detail(422, format!("Invalid request body: {error}"));
        }
    };
    debug!(latex = %request.latex, "received input");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| solve_latex(&request.latex, simplifier)));
    calculation_reply(&request.latex, outcome)
}

/// Turns the outcome of one calculation, panics included, into a reply.
fn calculation_reply(latex: &str, outcome: std::thread::Result<Result<Solution, Error>>) -> Reply {
    match outcome {
        Ok(Ok(solution)) => match serde_json::to_value(solution) {
            Ok(body) => Reply::new(200, body),
            Err(error) => Reply::detail(500, format!("Internal error: {error}")),
        },
        Ok(Err(error)) => {
            warn!(%error, latex, "calculation failed");
            Reply::detail(400, format!("Calculation error: {error}"))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(panic = message, latex, "calculation panicked");
            Reply::detail(400, format!("Calculation error: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("internal failure")
}
