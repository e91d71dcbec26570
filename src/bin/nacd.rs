#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nactranslate_daemon::run().await
}
