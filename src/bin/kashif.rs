// ─────────────────────────────────────────────────────────────────────────────
//  Kashif — Network Explorer
//  Part of the Shabaka toolkit for following value across Solana accounts.
//
//  Kashif (كاشف): "The Revealer" — uncovers the web of transfers around a
//  transaction or an account, one page at a time, so every hop can be traced.
//
//  Designed to follow every hop, patiently and faithfully.
//
//  In the name of Allah, the Most Gracious, the Most Merciful.
// ─────────────────────────────────────────────────────────────────────────────

use shabaka::engine::kashif::Kashif;
use shabaka::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
  Kashif::run().await?;
  Ok(())
}
