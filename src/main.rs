#[tokio::main]
async fn main() {
    rollcall_backend::run().await;
}
