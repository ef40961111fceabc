//! Simple demo driving a strip over the control connection

use std::time::Duration;

use esp_rgbw_ws::{Color, Strip, DEFAULT_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Replace with your controller's IP address
    let strip = Strip::connect("192.168.88.171", DEFAULT_PORT).await?;

    let command = strip.set_gpio_state("D3", true).await?;
    println!("Sent: {command}");

    strip.set_strip_white(0, true).await?;

    let command = strip.set_pixel(0, Color::named("magenta"), true).await?;
    println!("Sent: {command}");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let command = strip.set_pixel(0, Color::rgbw(255, 0, 0, 0), true).await?;
    println!("Sent: {command}");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let command = strip.set_line(0, 10, Color::rgbw(0, 0, 255, 0), true).await?;
    println!("Sent: {command}");
    tokio::time::sleep(Duration::from_secs(1)).await;

    let command = strip.set_strip(Color::rgbw(0, 50, 50, 0), true).await?;
    println!("Sent: {command}");
    tokio::time::sleep(Duration::from_secs(1)).await;

    strip.clear().await?;

    Ok(())
}
