#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todbot::run().await
}
