//! Discover a Nanoleaf device and fade all given panels through red, green and blue.
//!
//! ```text
//! NANOLEAF_TOKEN=<token> cargo run --example stream -- 1 2 3
//! ```
//!
//! Set `NANOLEAF_URL` to skip discovery and `RUST_LOG=debug` for wire details.

use nanoleaf_stream::{Discovery, FrameBatch, FrameColor, Nanoleaf, NanoleafError, PanelFrame};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let token = std::env::var("NANOLEAF_TOKEN")?;
    let panels: Vec<u32> = std::env::args()
        .skip(1)
        .map(|arg| arg.parse())
        .collect::<Result<_, _>>()?;

    let device = match std::env::var("NANOLEAF_URL") {
        Ok(url) => Nanoleaf::with_token(url, token)?,
        Err(_) => {
            let mut devices = Discovery::new().discover_devices(DISCOVERY_TIMEOUT).await?;
            if devices.is_empty() {
                println!("No devices found");
                return Ok(());
            }
            let mut device = devices.swap_remove(0);
            device.set_token(token);
            device
        }
    };
    println!("Using device at {}", device.url());

    let mut stream = device.stream();
    if let Err(e) = stream.activate("v2").await {
        if let NanoleafError::Unauthorized = e {
            println!("Token rejected, pair the device again");
        }
        return Err(e.into());
    }
    stream.connect().await?;

    let colors = [
        FrameColor::rgb(255, 0, 0, 5),
        FrameColor::rgb(0, 255, 0, 5),
        FrameColor::rgb(0, 0, 255, 5),
    ];

    let mut result = Ok(());
    for color in colors.iter().cycle().take(9) {
        let batch: FrameBatch = panels
            .iter()
            .map(|&id| PanelFrame::new(id, *color))
            .collect();

        if let Err(e) = stream.write_effect(&batch).await {
            result = Err(e);
            break;
        }
        tokio::time::sleep(Duration::from_millis(700)).await;
    }

    stream.disconnect()?;
    result.map_err(Into::into)
}
