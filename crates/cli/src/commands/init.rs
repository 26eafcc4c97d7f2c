use anyhow::Result;
use assetdb_storage::StatsStore;

use crate::open_storage;

pub(crate) async fn run() -> Result<()> {
    let storage = open_storage().await?;
    storage.ping().await?;
    println!("Schema ready (extensions, assets table, triggers, indexes).");
    Ok(())
}
