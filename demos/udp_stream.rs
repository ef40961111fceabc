//! Stream pixel frames over the datagram channel
//!
//! Negotiates UDP mode, then animates a moving dot at a rate the message
//! channel could not keep up with.

use std::time::Duration;

use esp_rgbw_ws::{Color, Strip, DEFAULT_PORT};

const STRIP_LEN: usize = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Replace with your controller's IP address
    let strip = Strip::connect("192.168.88.171", DEFAULT_PORT).await?;

    strip.udp_safe().await?;
    println!("UDP mode confirmed, streaming to {}", strip.udp_target());

    let mut frame = vec![Color::BLACK; STRIP_LEN];
    for tick in 0..600 {
        frame.fill(Color::BLACK);
        frame[tick % STRIP_LEN] = Color::rgbw(0, 180, 255, 0);
        strip.send_udp_packet(&frame).await?;
        tokio::time::sleep(Duration::from_millis(16)).await;
    }

    Ok(())
}
