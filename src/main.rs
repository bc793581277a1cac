use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    boardsync::cli::run().await
}
