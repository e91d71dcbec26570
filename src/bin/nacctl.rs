#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nactranslate_cli::run().await
}
