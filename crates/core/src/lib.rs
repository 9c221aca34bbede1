pub mod clock;
pub mod dialogue;
pub mod export;
pub mod input;
pub mod keys;
pub mod logger;
pub mod orchestrator;
pub mod platform;
pub mod scaler;
pub mod settings;
pub mod types;
