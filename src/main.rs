#[tokio::main]
async fn main() {
    if let Err(e) = cardiocheck_lib::run().await {
        eprintln!("cardiocheck: {e}");
        std::process::exit(1);
    }
}
