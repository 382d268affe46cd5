use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed socket frame: {0}")]
    MalformedFrame(String),

    #[error("Unknown event name: {0}")]
    UnknownEvent(String),

    #[error("Malformed push payload: {0}")]
    MalformedPayload(String),
}
