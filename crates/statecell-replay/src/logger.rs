//! Logging setup
//!
//! Logs go to stderr so stdout only carries state output. The level comes
//! from `RUST_LOG` (a `.env` file is honoured), defaulting to `info`.

use env_logger::Env;

pub fn init() {
    // Load .env before reading RUST_LOG
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
        Err(_) => log::debug!(".env file not found, will rely on environment variables"),
    }
}
