//! Process-backed connection to `isabelle vscode_server`.
//!
//! [`ProcessPideServer`] spawns the server described by a
//! [`ServerProcessConfig`], speaks JSON-RPC 2.0 over its stdio with LSP
//! header framing, and implements [`PideServer`](crate::PideServer) so the
//! session controller can drive it.
//!
//! - [`ServerProcessConfig`]: executable, arguments and working directory
//! - [`AdapterError`] and [`TransportError`]: failures below the trait seam
//! - [`JsonRpcMessage`]: classification of inbound frames
//! - [`StdioTransport`]: `Content-Length` framing over any reader and writer
//! - [`JsonRpcChannel`]: request/response matching that queues pushes

mod config;
mod error;
mod jsonrpc;
mod lifecycle;
mod messaging;
mod process;
mod state;
mod trait_impl;
mod transport;

pub use config::ServerProcessConfig;
pub use error::{AdapterError, TransportError};
pub use jsonrpc::{
    IncomingNotification, IncomingRequest, JsonRpcError, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse,
};
pub use messaging::JsonRpcChannel;
pub use process::ProcessPideServer;
pub use state::{ChildChannel, ProcessState};
pub use transport::{ChildTransport, StdioTransport};
