//! # User Data MCP Server
//!
//! Serves the user data tools, resources and prompts to an MCP client over
//! stdin/stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! USER_DATA_DIR=./data RUST_LOG=debug cargo run --bin user-data-server
//! ```
//!
//! | Variable         | Default      | Meaning                          |
//! |------------------|--------------|----------------------------------|
//! | `USER_DATA_DIR`  | `data`       | Directory holding the users file |
//! | `USER_DATA_FILE` | `users.json` | File name inside that directory  |
//! | `RUST_LOG`       | `info`       | Log filter                       |

use std::process;
use user_data_server::mcp_integration::UserDataMcpServer;
use user_data_server::{ServerConfig, UserDataService};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    let service = match UserDataService::from_config(&config).await {
        Ok(service) => service,
        Err(e) => {
            log::error!("Failed to open user storage: {}", e);
            process::exit(1);
        }
    };

    let server = UserDataMcpServer::with_info(service, config.server_info.clone().into());
    if let Err(e) = server.run_stdio().await {
        log::error!("Transport error: {}", e);
        process::exit(1);
    }
}
