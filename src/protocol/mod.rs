//! Room wire protocol
//!
//! JSON frames over a persistent duplex connection scoped to one room.
//! Inbound shapes form a closed tagged union; anything else is rejected at
//! decode time and never reaches room state.

pub mod messages;
pub mod serialize;

pub use messages::{ClientMessage, Player, ServerMessage};
pub use serialize::{
    decode_client_message, decode_server_message, encode_client_message, encode_server_message,
};
