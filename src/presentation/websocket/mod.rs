mod broadcaster;
mod channel;
mod handler;
mod message;
mod registry;

pub use broadcaster::QuoteBroadcaster;
pub use channel::{ChannelError, ClientChannel, ConnectionId};
pub use handler::{WsState, ws_handler};
pub use message::{ClientMessage, ServerMessage};
pub use registry::ConnectionRegistry;
