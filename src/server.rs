//! HTTP listener for the contact form relay.
//!
//! Requests are accepted on a blocking task and handled strictly one at a
//! time, so a slow SMTP exchange holds up the next submission.

use std::future::Future;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::contact::{relay, MailRoute};
use crate::error::SiteError;
use crate::ports::MailSender;

/// Where an incoming request should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Routing {
    Relay,
    NotFound,
    MethodNotAllowed,
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Path of the form endpoint, e.g. `/procesar_formulario`.
    pub route: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

/// A bound listener that has not started accepting yet.
pub struct RelayServer {
    server: Arc<Server>,
    addr: SocketAddr,
    options: ServeOptions,
}

impl RelayServer {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(addr: SocketAddr, options: ServeOptions) -> Result<Self, SiteError> {
        let server = Server::http(addr).map_err(|e| SiteError::Http(format!("Failed to bind {addr}: {e}")))?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);
        Ok(Self { server: Arc::new(server), addr, options })
    }

    /// The address actually bound, with the real port when `:0` was requested.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve requests until `shutdown` resolves.
    ///
    /// `shutdown` is polled for the whole run, so a signal that arrives
    /// while a request is being handled stops the loop once it is answered.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener stops accepting connections.
    pub async fn run(
        self,
        mail_route: &MailRoute,
        sender: &dyn MailSender,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), SiteError> {
        tokio::pin!(shutdown);
        loop {
            let server = Arc::clone(&self.server);
            let accept = tokio::task::spawn_blocking(move || server.recv());

            let request = tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    self.server.unblock();
                    return Ok(());
                }
                joined = accept => joined
                    .map_err(|e| SiteError::Http(format!("Accept task failed: {e}")))?
                    .map_err(SiteError::Io)?,
            };

            if let Err(e) = self.handle(request, mail_route, sender).await {
                tracing::warn!(error = %e, "failed to answer request");
            }
        }
    }

    async fn handle(&self, mut request: Request, mail_route: &MailRoute, sender: &dyn MailSender) -> Result<(), SiteError> {
        let routing = route_request(request.method(), request.url(), &self.options.route);
        tracing::debug!(method = %request.method(), url = request.url(), ?routing, "request");

        match routing {
            Routing::NotFound => return respond(request, 404, "Not Found", None),
            Routing::MethodNotAllowed => return respond(request, 405, "Method Not Allowed", Some(("Allow", "POST"))),
            Routing::Relay => {}
        }

        let limit = self.options.max_body_bytes;
        if request.body_length().is_some_and(|len| len > limit) {
            return respond(request, 413, "Payload Too Large", None);
        }
        let mut body = Vec::new();
        request.as_reader().take(limit as u64 + 1).read_to_end(&mut body)?;
        if body.len() > limit {
            return respond(request, 413, "Payload Too Large", None);
        }

        match relay(&body, mail_route, sender).await {
            Ok(message) => respond(request, 200, message, None),
            Err(e) => {
                let (status, text) = error_response(&e);
                if status >= 500 {
                    tracing::error!(error = %e, "contact message not relayed");
                } else {
                    tracing::info!(error = %e, "rejected contact form");
                }
                respond(request, status, &text, None)
            }
        }
    }
}

/// Resolves on the first Ctrl-C. If the handler cannot be installed the
/// server keeps running until killed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn route_request(method: &Method, url: &str, route: &str) -> Routing {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path != route {
        Routing::NotFound
    } else if *method == Method::Post {
        Routing::Relay
    } else {
        Routing::MethodNotAllowed
    }
}

/// Status and body for a failed relay. Transport details stay in the log.
fn error_response(err: &SiteError) -> (u16, String) {
    match err {
        SiteError::MissingField(_) => (400, err.to_string()),
        _ => (500, "Internal Server Error".to_string()),
    }
}

fn respond(request: Request, status: u16, body: &str, extra: Option<(&str, &str)>) -> Result<(), SiteError> {
    let mut response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", "text/plain; charset=utf-8")?);
    if let Some((name, value)) = extra {
        response = response.with_header(header(name, value)?);
    }
    request.respond(response)?;
    Ok(())
}

fn header(name: &str, value: &str) -> Result<Header, SiteError> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| SiteError::Http(format!("Invalid header {name}: {value}")))
}
