mod cli;

#[tokio::main]
async fn main() {
    if let Err(err) = momentum_notify::logging::setup_tracing() {
        eprintln!("failed to set up logging: {err}");
    }

    let code = cli::run().await;
    std::process::exit(code);
}
