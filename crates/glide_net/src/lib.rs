//! Glide Network Layer
//!
//! Client-side state synchronization with a remote simulation host:
//!
//! - **Publishing**: local key state goes out at a fixed rate, fire-and-forget
//! - **Ingesting**: authoritative snapshots come in and feed a two-sample history
//! - **Prediction**: the render side extrapolates one interval ahead and glides
//!   toward it between updates
//!
//! ```text
//!  keys ─▶ InputPublisher ─▶ InputSink ─────▶ host
//!  host ─▶ StateSource ─▶ StateIngestor ─watch─▶ RenderView ─▶ renderer
//! ```
//!
//! [`SyncSession`] wires it all up on a background thread.

pub mod config;
pub mod error;
pub mod history;
pub mod ingestor;
pub mod predictor;
pub mod protocol;
pub mod publisher;
pub mod session;
pub mod sync_loop;
pub mod transport;
pub mod view;

pub use config::SyncConfig;
pub use error::{DecodeError, Result, SyncError, TransportError};
pub use history::{HistoryBuffer, PositionSample};
pub use ingestor::StateIngestor;
pub use predictor::{extrapolate, interpolate, Extrapolation, PositionPredictor, PredictionState};
pub use protocol::{InputEvent, InputSnapshot, KeySymbol, StateSnapshot};
pub use publisher::{InputPublisher, InputSource};
pub use session::SyncSession;
pub use sync_loop::SyncLoop;
pub use view::RenderView;
