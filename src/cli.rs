use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tictac-session")]
#[command(about = "Tic-tac-toe session server shared by every connected websocket client")]
pub struct Cli {
    /// Address the websocket server listens on
    #[arg(long, env = "TICTAC_ADDRESS", default_value = "127.0.0.1:8080")]
    pub address: String,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "tictac_session=debug")
    #[arg(long, env = "TICTAC_LOG", default_value = "info")]
    pub log_level: String,

    /// Display name for clients that connect without a `name` query parameter
    #[arg(long, default_value = "Unknown")]
    pub default_name: String,
}
