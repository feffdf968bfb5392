//! `ping`: check that the API is reachable with the configured key.

use anyhow::Result;

use crate::context::Context;
use crate::service;

pub async fn execute(ctx: &Context) -> Result<()> {
    let reachable = service::ping(ctx).await;

    if !reachable {
        ctx.fail("Gobii API is unreachable");
    }

    if ctx.out.is_json() {
        return ctx.out.json(&reachable);
    }

    if reachable {
        ctx.out.result("Gobii API is reachable");
    }

    Ok(())
}
