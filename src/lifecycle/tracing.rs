//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter. The
//! filter comes from `RUST_LOG` when it is set, otherwise from the configured
//! fallback (`log_filter` in the config file).
//!
//! ```bash
//! RUST_LOG=info cargo run                    # commits, creates, deletes
//! RUST_LOG=debug cargo run                   # every request and its label
//! RUST_LOG=blog_store::store=debug cargo run # only the store actor
//! ```
//!
//! The store actor logs one line per request at debug (`label="get_post"`),
//! one per commit at info with the number of changes, and one per rollback at
//! warn with the error that caused it. Service methods run inside a span named
//! after the method; the actor runs on its own task, so its lines name the
//! method through `label` instead.

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(fallback_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    // A subscriber installed earlier (tests, embedders) stays in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
