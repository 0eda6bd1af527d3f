pub mod generation_log;

pub use generation_log::GenerationLog;
