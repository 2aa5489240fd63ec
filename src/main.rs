#[tokio::main]
async fn main() {
    if let Err(err) = youtube_resolver_lib::run().await {
        eprintln!("youtube-resolver error: {:#}", err);
        std::process::exit(1);
    }
}
