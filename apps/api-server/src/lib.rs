//! # Inkwell API Server
//!
//! Actix-web application: routes, extractors, error mapping and state
//! wiring. The binary in `main.rs` only loads configuration and calls [`run`].

use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use observability::RequestIdMiddleware;
use state::AppState;

/// Start serving on an already-bound listener. Binding to port 0 lets
/// callers pick an ephemeral port.
pub fn run(listener: TcpListener, state: AppState) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
