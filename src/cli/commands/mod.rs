//! CLI command implementations.

mod complete;
mod config;
mod doctor;
mod extract;
mod generate;
mod ideas;
mod init;
mod serve;
mod thumbnail;
mod voice;

pub use complete::run_complete;
pub use config::run_config;
pub use doctor::run_doctor;
pub use extract::run_extract;
pub use generate::run_generate;
pub use ideas::run_ideas;
pub use init::run_init;
pub use serve::run_serve;
pub use thumbnail::run_thumbnail;
pub use voice::run_voice;
