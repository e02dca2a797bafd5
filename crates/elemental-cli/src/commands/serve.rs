//! Serve command

use clap::Args;
use elemental_server::{run_server, AppState};

use crate::AppContext;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:8080
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Require this bearer token on every route except /health
    #[arg(long, env = "ELEMENTAL_TOKEN")]
    pub token: Option<String>,
}

pub async fn run(args: &ServeArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(addr) = &args.addr {
        server.addr = addr.clone();
    }
    if args.token.is_some() {
        server.auth_token = args.token.clone();
    }
    server.default_deadline_secs = ctx.config.deadline;

    tracing::info!("Serving {} elements", ctx.db.len());
    let state = AppState::new(ctx.db.clone(), ctx.config.search.clone(), server);
    run_server(state).await
}
