//! ESP8266 RGBW strip session
//!
//! [`Strip`] owns both transports, mirrors the device's mode flags and
//! republishes decoded events to subscribers. Mode checks are synchronous
//! and purely client-side: the cached mirror is trusted, the device is
//! never consulted at call time.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{broadcast, RwLock};
use tokio_tungstenite::tungstenite::Message;

use crate::color::Color;
use crate::connection::{WsConnection, WsSource};
use crate::datagram::DatagramSender;
use crate::error::{Error, Result};
use crate::pins::PinMapping;
use crate::protocol::{Command, CommandEncoder, DecodedFrame, FrameDecoder, PacketBuilder, UdpOpcode};

/// Default control port of the firmware's WebSocket server
pub const DEFAULT_PORT: u16 = 80;

/// Deadline applied to correlated exchanges unless the caller picks one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Reply text the firmware sends once its datagram channel is open
const UDP_READY_REPLY: &str = "UDP:ON";

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Client-side mirror of the device's mode flags.
///
/// All three start `false` and change only when the device reports state
/// (`INFO:` frames) or when the UDP handshake is confirmed. UDP mode is a
/// one-way transition: the protocol has no operation that turns it back
/// off within a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    udp: bool,
    raw: bool,
    debug: bool,
}

impl ModeState {
    /// Whether the datagram channel is open and the message channel is
    /// therefore closed to pixel commands.
    pub fn udp_enabled(&self) -> bool {
        self.udp
    }

    /// Whether raw pass-through mode is on.
    pub fn raw_enabled(&self) -> bool {
        self.raw
    }

    /// Whether the device reports debug information.
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn apply(&mut self, udp: Option<bool>, raw: Option<bool>, debug: Option<bool>) {
        if let Some(udp) = udp {
            self.udp = udp;
        }
        if let Some(raw) = raw {
            self.raw = raw;
        }
        if let Some(debug) = debug {
            self.debug = debug;
        }
    }

    fn confirm_udp(&mut self) {
        self.udp = true;
    }
}

/// Events republished to subscribers, in frame arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripEvent {
    /// A watched GPIO pin changed
    Pin { label: String, state: String },
    /// The firmware reported a pin-related fault
    Err { label: String, detail: String },
    /// Raw-mode payload
    Raw { payload: String },
    /// Unclassified text from the device
    Message { text: String },
    /// The control connection closed; the session will not reconnect
    Closed,
}

/// Handle to one strip session
///
/// # Example
/// ```no_run
/// use esp_rgbw_ws::{Color, Strip, DEFAULT_PORT};
///
/// # async fn example() -> esp_rgbw_ws::Result<()> {
/// let strip = Strip::connect("192.168.1.50", DEFAULT_PORT).await?;
/// strip.set_strip(Color::named("magenta"), true).await?;
/// # Ok(())
/// # }
/// ```
pub struct Strip {
    conn: Arc<WsConnection>,
    datagram: DatagramSender,
    modes: Arc<RwLock<ModeState>>,
    pins: Arc<RwLock<PinMapping>>,
    events: broadcast::Sender<StripEvent>,
}

impl Strip {
    /// Connect to the strip controller at `ws://<host>:<port>` and bind
    /// the companion UDP socket aimed at `<host>:<port + 1>`.
    ///
    /// The read loop starts immediately; decoded events are delivered to
    /// every subscriber from the moment this returns. On transport close
    /// or error the session goes back to disconnected, publishes
    /// [`StripEvent::Closed`] and stays down; reconnecting means calling
    /// `connect` again.
    pub async fn connect(host: impl AsRef<str>, port: u16) -> Result<Self> {
        let host = host.as_ref();
        let (conn, source) = WsConnection::open(host, port).await?;
        let datagram = DatagramSender::open(host, port).await?;
        let modes = Arc::new(RwLock::new(ModeState::default()));
        let pins = Arc::new(RwLock::new(PinMapping::wemos_d1_r1()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self::spawn_read_loop(
            Arc::clone(&conn),
            source,
            Arc::clone(&modes),
            Arc::clone(&pins),
            events.clone(),
        );

        Ok(Self {
            conn,
            datagram,
            modes,
            pins,
            events,
        })
    }

    /// Subscribe to decoded device events.
    pub fn subscribe(&self) -> broadcast::Receiver<StripEvent> {
        self.events.subscribe()
    }

    /// Whether the control connection is still up.
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Snapshot of the cached mode flags.
    pub async fn modes(&self) -> ModeState {
        *self.modes.read().await
    }

    /// Whether UDP mode has been confirmed for this session.
    pub async fn udp_enabled(&self) -> bool {
        self.modes.read().await.udp_enabled()
    }

    /// Whether the device reported raw mode on.
    pub async fn raw_enabled(&self) -> bool {
        self.modes.read().await.raw_enabled()
    }

    /// Whether the device reported debug mode on.
    pub async fn debug_enabled(&self) -> bool {
        self.modes.read().await.debug_enabled()
    }

    /// Switch the active board profile used to translate pin labels and
    /// decode inbound pin events.
    pub async fn set_pin_map(&self, name: &str) -> Result<()> {
        let mapping = PinMapping::by_name(name)?;
        *self.pins.write().await = mapping;
        Ok(())
    }

    /// Name of the active board profile.
    pub async fn pin_map(&self) -> String {
        self.pins.read().await.name().to_string()
    }

    /// Set one pixel. With `draw` false the change stays in the strip
    /// buffer until [`Strip::show`].
    ///
    /// Returns the wire string that was sent.
    pub async fn set_pixel(&self, index: u16, color: Color, draw: bool) -> Result<String> {
        self.send_command(Command::SetPixel { index, color, draw })
            .await
    }

    /// Set the pixels from `start` to `end` inclusive.
    pub async fn set_line(&self, start: u16, end: u16, color: Color, draw: bool) -> Result<String> {
        self.send_command(Command::SetLine {
            start,
            end,
            color,
            draw,
        })
        .await
    }

    /// Set every pixel on the strip.
    pub async fn set_strip(&self, color: Color, draw: bool) -> Result<String> {
        self.send_command(Command::SetStrip { color, draw }).await
    }

    /// Set only the white channel of every pixel.
    pub async fn set_strip_white(&self, white: u8, draw: bool) -> Result<String> {
        self.send_command(Command::SetStripWhite { white, draw })
            .await
    }

    /// Configure a GPIO pin as output (`true`) or input (`false`). The
    /// label is resolved through the active board profile.
    pub async fn set_gpio_mode(&self, pin: &str, output: bool) -> Result<String> {
        let pin = self.resolve_pin(pin).await?;
        self.send_command(Command::GpioPinMode { pin, output }).await
    }

    /// Drive a GPIO pin high (`true`) or low (`false`).
    pub async fn set_gpio_state(&self, pin: &str, high: bool) -> Result<String> {
        let pin = self.resolve_pin(pin).await?;
        self.send_command(Command::GpioPinState { pin, high }).await
    }

    /// Blank the strip buffer.
    pub async fn clear(&self) -> Result<String> {
        self.send_command(Command::Clear).await
    }

    /// Push the strip buffer to the LEDs.
    pub async fn show(&self) -> Result<String> {
        self.send_command(Command::Show).await
    }

    /// Ask the device to report its mode flags. The reply arrives as an
    /// `INFO:` frame and updates the cached [`ModeState`].
    pub async fn get_state(&self) -> Result<String> {
        self.send_command(Command::State).await
    }

    /// Toggle debug reporting on the device.
    pub async fn debug(&self) -> Result<String> {
        self.send_command(Command::Debug).await
    }

    /// Toggle raw pass-through mode on the device.
    pub async fn raw(&self) -> Result<String> {
        self.send_command(Command::Raw).await
    }

    /// Send arbitrary text on the control connection. Requires the device
    /// to have reported raw mode on.
    pub async fn send_raw(&self, text: &str) -> Result<()> {
        self.ensure_message_channel().await?;
        if !self.modes.read().await.raw_enabled() {
            return Err(Error::ProtocolState(
                "raw mode is not enabled on the device".to_string(),
            ));
        }
        self.conn.send_text(text).await
    }

    /// Enable UDP mode via the confirmed handshake.
    ///
    /// Sends `UDP` and waits for the device's literal `UDP:ON` reply;
    /// only then is the cached flag flipped. Once enabled every
    /// message-channel command fails with a protocol state error and
    /// pixel data flows over [`Strip::send_udp_packet`] instead. The
    /// switch is one-way for the rest of the session. Calling this again
    /// after it succeeded is a no-op.
    pub async fn udp_safe(&self) -> Result<()> {
        if self.modes.read().await.udp_enabled() {
            return Ok(());
        }
        let wire = CommandEncoder::encode(&Command::Udp);
        self.conn
            .request(&wire, UDP_READY_REPLY, DEFAULT_REQUEST_TIMEOUT)
            .await?;
        self.modes.write().await.confirm_udp();
        log::debug!("UDP mode confirmed; message-channel commands are now rejected");
        Ok(())
    }

    /// Send a command and wait for a specific reply frame.
    ///
    /// The low-level correlated exchange behind [`Strip::udp_safe`],
    /// exposed for firmware variants with extra handshakes. Fails with a
    /// timeout error when no exactly-matching frame arrives in time; the
    /// reply matcher is deregistered on every exit path.
    pub async fn send_and_await(
        &self,
        command: Command,
        expected_reply: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.ensure_message_channel().await?;
        let wire = CommandEncoder::encode(&command);
        self.conn.request(&wire, expected_reply, timeout).await
    }

    /// Stream one bulk RGBW frame over the datagram channel.
    ///
    /// Requires a confirmed [`Strip::udp_safe`] handshake. Delivery is
    /// best-effort and unordered; the frame carries its own checksum.
    pub async fn send_udp_packet(&self, colors: &[Color]) -> Result<()> {
        self.ensure_udp_channel().await?;
        let frame = PacketBuilder::build_bulk_frame(colors);
        self.datagram.send(&frame).await
    }

    /// Send a control opcode over the datagram channel.
    pub async fn send_udp_instruction_packet(&self, opcode: UdpOpcode) -> Result<()> {
        self.ensure_udp_channel().await?;
        let frame = PacketBuilder::build_opcode_frame(opcode);
        self.datagram.send(&frame).await
    }

    /// Address the datagram channel is aimed at.
    pub fn udp_target(&self) -> &str {
        self.datagram.target()
    }

    async fn send_command(&self, command: Command) -> Result<String> {
        self.ensure_message_channel().await?;
        let wire = CommandEncoder::encode(&command);
        self.conn.send_text(&wire).await?;
        Ok(wire)
    }

    async fn resolve_pin(&self, label: &str) -> Result<u8> {
        let pins = self.pins.read().await;
        pins.number(label).ok_or_else(|| {
            Error::Configuration(format!(
                "pin {label:?} is not defined by board profile {:?}",
                pins.name()
            ))
        })
    }

    async fn ensure_message_channel(&self) -> Result<()> {
        if self.modes.read().await.udp_enabled() {
            return Err(Error::ProtocolState(
                "message-channel commands are disabled while UDP mode is active".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_udp_channel(&self) -> Result<()> {
        if !self.modes.read().await.udp_enabled() {
            return Err(Error::ProtocolState(
                "UDP mode is not enabled; complete the udp_safe handshake first".to_string(),
            ));
        }
        Ok(())
    }

    fn spawn_read_loop(
        conn: Arc<WsConnection>,
        mut source: WsSource,
        modes: Arc<RwLock<ModeState>>,
        pins: Arc<RwLock<PinMapping>>,
        events: broadcast::Sender<StripEvent>,
    ) {
        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        Self::process_frame(&conn, &modes, &pins, &events, &text).await;
                    }
                    Ok(Message::Close(_)) => {
                        log::debug!("device closed the control connection");
                        break;
                    }
                    // Ping/pong are answered by the protocol layer and the
                    // firmware never sends binary on this channel.
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("control connection failed: {e}");
                        break;
                    }
                }
            }
            conn.mark_closed();
            let _ = events.send(StripEvent::Closed);
        });
    }

    async fn process_frame(
        conn: &WsConnection,
        modes: &RwLock<ModeState>,
        pins: &RwLock<PinMapping>,
        events: &broadcast::Sender<StripEvent>,
        text: &str,
    ) {
        // Correlated exchanges first, then normal routing; a reply frame
        // still reaches subscribers as a plain message.
        conn.resolve_pending(text);

        let decoded = {
            let pins = pins.read().await;
            FrameDecoder::decode(text, &pins)
        };

        let event = match decoded {
            DecodedFrame::Info { udp, raw, debug } => {
                modes.write().await.apply(udp, raw, debug);
                log::debug!("device state update: {:?}", *modes.read().await);
                return;
            }
            DecodedFrame::Pin { label, state } => StripEvent::Pin { label, state },
            DecodedFrame::Error { label, detail } => StripEvent::Err { label, detail },
            DecodedFrame::Raw { payload } => StripEvent::Raw { payload },
            DecodedFrame::Message { text } => StripEvent::Message { text },
        };
        // Send only fails when nobody subscribed, which is fine.
        let _ = events.send(event);
    }
}
