#[tokio::main]
async fn main() {
    health_advisor::run().await;
}
