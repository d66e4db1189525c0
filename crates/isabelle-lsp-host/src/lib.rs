//! Session controller and server connection for the Isabelle bridge.
//!
//! The crate owns the moving parts between the prover's language server and
//! an editor:
//!
//! - [`PideServer`] abstracts the server connection; [`adapter`] provides the
//!   process-backed implementation speaking JSON-RPC over stdio.
//! - [`EditorHost`] abstracts the editor primitives the bridge needs.
//! - [`Session`] wires the two together: it forwards caret movement, renders
//!   server pushes into the output, state and progress panels, reconciles
//!   decorations per document and answers code-action requests.

pub mod adapter;
mod commands;
mod editor;
mod errors;
mod server;
mod session;

#[cfg(test)]
mod tests;

pub use commands::{CommandParseError, UserCommand};
pub use editor::{BufferHandle, CursorPosition, EditorError, EditorHost, Surface};
pub use errors::{SessionError, SessionOperation};
pub use server::{InboundNotification, PideServer, ServerError};
pub use session::{Session, SessionSettings, THEORY_EXTENSION};
