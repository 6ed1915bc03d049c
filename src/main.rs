#[tokio::main]
async fn main() {
    if let Err(err) = night_nurse::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
