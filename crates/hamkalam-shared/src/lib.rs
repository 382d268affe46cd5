// Types, event contracts and constants shared between the page-side client
// and the background worker.

pub mod constants;
pub mod error;
pub mod protocol;
pub mod types;

pub use error::ProtocolError;
pub use protocol::{ClientEvent, PushPayload, ServerEvent};
pub use types::{MessageId, SeqNo, Theme, UserId};
