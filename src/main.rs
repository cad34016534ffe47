use clap::Parser;
use magic_caption::config::{app_state, setup_logging};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = magic_caption::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let state = match app_state(&cli) {
        Ok(state) => state,
        Err(err) => {
            error!("Configuration error: {}", err);
            return;
        }
    };

    if let Err(err) =
        magic_caption::web::setup_server(&cli.listen_address, cli.port, state).await
    {
        error!("Application error: {}", err);
    }
}
