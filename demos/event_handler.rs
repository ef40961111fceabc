//! Print every event the strip controller publishes

use esp_rgbw_ws::{Strip, StripEvent, DEFAULT_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Replace with your controller's IP address
    let strip = Strip::connect("192.168.88.171", DEFAULT_PORT).await?;
    let mut events = strip.subscribe();

    println!("Connected. Waiting for events, press Ctrl+C to exit");
    strip.get_state().await?;

    while let Ok(event) = events.recv().await {
        match event {
            StripEvent::Pin { label, state } => println!("pin {label} is {state}"),
            StripEvent::Err { label, detail } => println!("error on {label}: {detail}"),
            StripEvent::Raw { payload } => println!("raw: {payload}"),
            StripEvent::Message { text } => println!("message: {text}"),
            StripEvent::Closed => {
                println!("connection closed");
                break;
            }
        }
    }

    Ok(())
}
