//! tally server library.
//!
//! Wires the identity cache and counter store into the two host callbacks
//! ([`Authenticator`], [`TrafficLogger`]) and exposes the management API.
//! A host proxy embeds [`Accountant`]; the `tally-server` binary runs the
//! background loops and the API on their own.

mod accountant;
pub mod api;
pub mod cli;
mod error;
mod service;
mod traits;

pub use accountant::Accountant;
pub use cli::ServerArgs;
pub use error::ServerError;
pub use service::Service;
pub use tokio_util::sync::CancellationToken;
pub use traits::{Authenticator, TrafficLogger};
