// Realtime event channel to the chat server, over a websocket.

pub mod socket;

pub use socket::{spawn_socket, SocketCommand, SocketConfig, SocketNotification};
