//! ESP8266 RGBW Strip Client Library
//!
//! This library provides a Rust client for ESP8266-driven addressable RGBW
//! LED strips. Commands and events travel over a WebSocket control
//! connection (text frames, default port 80); once UDP mode is negotiated,
//! bulk pixel data streams over a checksummed binary datagram channel at
//! the control port plus one.
//!
//! ## Example
//!
//! ```no_run
//! use esp_rgbw_ws::{Color, Strip, DEFAULT_PORT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let strip = Strip::connect("192.168.1.50", DEFAULT_PORT).await?;
//!     strip.set_pixel(0, Color::named("red"), true).await?;
//!     strip.set_line(1, 10, Color::rgbw(0, 0, 255, 0), true).await?;
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod device;
pub mod error;
pub mod pins;
pub mod protocol;

mod connection;
mod datagram;

pub use color::Color;
pub use device::{ModeState, Strip, StripEvent, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{Error, Result};
pub use pins::{PinMapping, UNKNOWN_PIN_LABEL};
pub use protocol::{Command, CommandEncoder, DecodedFrame, FrameDecoder, PacketBuilder, UdpOpcode};
