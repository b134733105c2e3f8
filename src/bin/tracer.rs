// ─────────────────────────────────────────────────────────────────────────────
//  Tracer :: Multi-Hop History Crawler
//  Part of Chainscope, the fund-flow exploration core.
//
//  Fans out batched address-history queries hop by hop, merges the
//  discoveries into an in-memory session, and prints the resulting graph
//  topology: hop histogram, clusters, top balances.
// ─────────────────────────────────────────────────────────────────────────────

use chainscope::engine::tracer::Tracer;
use chainscope::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    Tracer::run().await?;
    Ok(())
}
