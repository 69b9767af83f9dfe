#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    authex::run().await
}
