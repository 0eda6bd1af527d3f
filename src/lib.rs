pub mod config;
pub mod instrumentation;
pub mod llm;
pub mod niche;
pub mod server;

pub use config::Config;
pub use niche::{GenerateReply, NichePipeline, NicheRecord};
