//! UDP sender for the pixel streaming channel

use tokio::net::UdpSocket;

use crate::error::{Error, Result};

/// Send-only datagram socket aimed at the device's pixel port, which sits
/// one above the control port.
pub(crate) struct DatagramSender {
    socket: UdpSocket,
    target: String,
}

impl DatagramSender {
    pub(crate) async fn open(host: &str, control_port: u16) -> Result<Self> {
        let pixel_port = control_port.checked_add(1).ok_or_else(|| {
            Error::Configuration(format!(
                "control port {control_port} leaves no room for the pixel port"
            ))
        })?;
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(Self {
            socket,
            target: format!("{host}:{pixel_port}"),
        })
    }

    /// Fire one frame at the pixel port. Delivery is best-effort; a send
    /// failure is surfaced to the caller and logged, nothing is retried.
    pub(crate) async fn send(&self, frame: &[u8]) -> Result<()> {
        if let Err(e) = self.socket.send_to(frame, self.target.as_str()).await {
            log::warn!("datagram send to {} failed: {}", self.target, e);
            return Err(e.into());
        }
        Ok(())
    }

    pub(crate) fn target(&self) -> &str {
        &self.target
    }
}
