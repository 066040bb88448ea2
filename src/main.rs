use thingsview::commands::Cli;
use thingsview::libs::messages::macros::is_debug_mode;
use thingsview::msg_error;

#[tokio::main]
async fn main() {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("thingsview=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = Cli::menu().await {
        msg_error!(e);
        std::process::exit(1);
    }
}
