use std::process;
use std::sync::Arc;

use log::{error, info};

use shelfbot::api::StorageClient;
use shelfbot::bot::{Dispatcher, TelegramTransport};
use shelfbot::config::Config;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            process::exit(1);
        }
    };

    let storage = match StorageClient::new(&config.server_url, config.request_timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("failed to build storage client: {e}");
            process::exit(1);
        }
    };

    let transport = match TelegramTransport::new(&config) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!("failed to build transport: {e}");
            process::exit(1);
        }
    };

    info!(
        "shelfbot started, storage service at {}",
        config.server_url
    );

    let dispatcher = Dispatcher::new(storage, transport.clone());
    transport.run(dispatcher).await;
}
