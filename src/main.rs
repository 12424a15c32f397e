#[tokio::main]
async fn main() {
    codesage_dashboard::logging::init_logging();

    if let Err(e) = codesage_dashboard::run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
