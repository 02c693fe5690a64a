pub mod context;
pub mod lifecycle;

pub use context::AppContext;
pub use lifecycle::{build_app, run_standalone, serve, start_embedded, BackendHandle};

pub async fn run() -> anyhow::Result<()> {
    run_standalone().await
}
