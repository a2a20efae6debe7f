use std::{net::SocketAddr, process::ExitCode};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use trackeroo::{
    API_PREFIX,
    demo::{DEMO_EMAIL, DEMO_PASSWORD, DemoState, build_demo_router},
    graceful_shutdown,
};

/// An in-memory expense tracker backend for trying out the client.
///
/// Nothing is saved, all data is lost when the server stops.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Create a demo account with some transactions.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let state = if args.seed {
        match DemoState::seeded() {
            Ok(state) => {
                tracing::info!("Log in as {DEMO_EMAIL} with the password {DEMO_PASSWORD:?}");
                state
            }
            Err(error) => {
                tracing::error!("Could not create the demo account: {error}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        DemoState::new()
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_demo_router(state));

    tracing::info!("HTTP server listening on http://{addr}{API_PREFIX}");
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(filter::LevelFilter::INFO),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers that produce them.
        .on_failure(());

    router.layer(tracing_layer)
}
