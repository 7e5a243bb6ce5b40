#[tokio::main]
async fn main() {
    mediagateway_lib::run().await;
}
