//! Protocol implementation for the ESP8266 RGBW strip firmware

pub mod command;
pub mod event;
pub mod packet;

pub use command::{Command, CommandEncoder};
pub use event::{DecodedFrame, FrameDecoder};
pub use packet::{PacketBuilder, UdpOpcode, BULK_FRAME_HEADER};
