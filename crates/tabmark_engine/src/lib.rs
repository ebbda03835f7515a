//! Tabmark engine: effect execution for the core state machine.
//!
//! Runs conversions off the caller's thread (locally or against a remote
//! `/convert` endpoint), serves that endpoint, and writes output files.
mod convert;
mod engine;
mod persist;
mod server;
mod types;
mod wire;

pub use convert::{Converter, LocalConverter, RemoteConverter, RemoteSettings};
pub use engine::EngineHandle;
pub use persist::{write_output_file, PersistError};
pub use server::{router, serve, ServerError};
pub use types::{ConvertError, EngineError, EngineEvent, FailureKind};
pub use wire::{ConvertRequest, ConvertResponse};
