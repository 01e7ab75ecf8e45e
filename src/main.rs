use chess_link::cli::LinkHandler;
use chess_link::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut handler = LinkHandler::new(Config::from_env());
    handler.run()
}
