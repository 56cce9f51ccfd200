pub mod ai;
pub mod config;
pub mod context;
pub mod timer;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Runtime for the commands that drive async core APIs.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
