#[tokio::main]
async fn main() {
    ecopulse::start_server().await;
}
