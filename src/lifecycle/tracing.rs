//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); the request span carries the
//! method and path instead.
//!
//! ## What Gets Traced
//!
//! - **Registration**: each `register_type` call, with the resource name
//! - **Resolution**: the resolved id and query at `debug`, misses at `warn`
//! - **Dispatch**: the chosen handler at `debug`, completions at `info`
//! - **Rejections**: 404 and 405 decisions at `warn`, with the `Allow` set
//!
//! ## Usage Examples
//!
//! ```bash
//! # Completions and rejections only
//! RUST_LOG=info cargo run
//!
//! # Resolved endpoints and handler selection
//! RUST_LOG=debug cargo run
//!
//! # Path walking, segment by segment
//! RUST_LOG=rest_dispatch::routing=trace cargo run
//! ```
//!
//! ## Example Output
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Type registered resource=users
//! INFO handle: Handled method=POST path=/users operation=create status=201 Created
//! WARN handle: Entity request rejected method=PUT path=/users/u1 id="u1" status=405 Method Not Allowed allow="GET, PATCH"
//! INFO handle: Action ok method=POST path=/users/u1/actions/promote/invoke action="promote" status=200 OK
//! ```
//!
//! **With `RUST_LOG=debug`**, each request also shows how it was resolved:
//!
//! ```text
//! DEBUG handle: Resolved endpoint method=GET path=/users/u1/posts/p7 id=Some("p7") query=None
//! DEBUG handle: Dispatching entity request method=GET path=/users/u1/posts/p7 id="p7" operation=get
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
