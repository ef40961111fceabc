//! Command encoding for sending to the strip controller
//!
//! Commands travel over the control connection as UTF-8 text. Numeric
//! instructions use the shape `"<code>:<start>,<end>,<draw>,<r>,<g>,<b>,<w>"`
//! with booleans written as `1`/`0`; plain instructions are a bare keyword.

use crate::color::Color;
use crate::error::{Error, Result};

/// Instruction code for setting a single pixel
const OP_SET_PIXEL: u8 = 0;
/// Instruction code for setting a run of pixels
const OP_SET_LINE: u8 = 1;
/// Instruction code for setting the whole strip
const OP_SET_STRIP: u8 = 2;
/// Instruction code for setting only the white channel of the whole strip
const OP_SET_STRIP_WHITE: u8 = 3;
/// Instruction code for configuring a GPIO pin direction
const OP_GPIO_PIN_MODE: u8 = 8;
/// Instruction code for driving a GPIO pin level
const OP_GPIO_PIN_STATE: u8 = 9;

/// Command types that can be sent to the strip controller
///
/// The set is closed: every wire instruction the firmware understands has a
/// variant here, so an unknown operation cannot be expressed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set one pixel (`0:<index>,0,<draw>,<r>,<g>,<b>,<w>`)
    SetPixel {
        index: u16,
        color: Color,
        draw: bool,
    },
    /// Set the pixels from `start` to `end` (`1:<start>,<end>,<draw>,…`)
    SetLine {
        start: u16,
        end: u16,
        color: Color,
        draw: bool,
    },
    /// Set every pixel on the strip (`2:0,0,<draw>,…`)
    SetStrip { color: Color, draw: bool },
    /// Set only the white channel of every pixel (`3:0,0,<draw>,0,0,0,<w>`)
    SetStripWhite { white: u8, draw: bool },
    /// Configure a GPIO pin as output or input (`8:<pin>,<output>,0,0,0,0,0`)
    GpioPinMode { pin: u8, output: bool },
    /// Drive a GPIO pin high or low (`9:<pin>,<high>,0,0,0,0,0`)
    GpioPinState { pin: u8, high: bool },
    /// Blank the strip buffer (`CLEAR`)
    Clear,
    /// Push the strip buffer to the LEDs (`SHOW`)
    Show,
    /// Toggle raw pass-through mode on the device (`RAW`)
    Raw,
    /// Toggle debug reporting on the device (`DEBUG`)
    Debug,
    /// Ask the device to report its mode flags (`STATE`)
    State,
    /// Ask the device to open its datagram channel (`UDP`)
    Udp,
}

/// Encoder for converting commands to wire text
pub struct CommandEncoder;

impl CommandEncoder {
    /// Encode a command into its wire string. Total; plain keywords carry
    /// no parameters.
    pub fn encode(command: &Command) -> String {
        match command {
            Command::SetPixel { index, color, draw } => {
                Self::numeric(OP_SET_PIXEL, *index, 0, *draw, *color)
            }
            Command::SetLine {
                start,
                end,
                color,
                draw,
            } => Self::numeric(OP_SET_LINE, *start, *end, *draw, *color),
            Command::SetStrip { color, draw } => {
                Self::numeric(OP_SET_STRIP, 0, 0, *draw, *color)
            }
            Command::SetStripWhite { white, draw } => Self::numeric(
                OP_SET_STRIP_WHITE,
                0,
                0,
                *draw,
                Color::rgbw(0, 0, 0, *white),
            ),
            Command::GpioPinMode { pin, output } => Self::numeric(
                OP_GPIO_PIN_MODE,
                u16::from(*pin),
                u16::from(*output),
                false,
                Color::BLACK,
            ),
            Command::GpioPinState { pin, high } => Self::numeric(
                OP_GPIO_PIN_STATE,
                u16::from(*pin),
                u16::from(*high),
                false,
                Color::BLACK,
            ),
            Command::Clear => "CLEAR".to_string(),
            Command::Show => "SHOW".to_string(),
            Command::Raw => "RAW".to_string(),
            Command::Debug => "DEBUG".to_string(),
            Command::State => "STATE".to_string(),
            Command::Udp => "UDP".to_string(),
        }
    }

    fn numeric(code: u8, start: u16, end: u16, draw: bool, color: Color) -> String {
        format!(
            "{}:{},{},{},{},{},{},{}",
            code,
            start,
            end,
            u8::from(draw),
            color.r,
            color.g,
            color.b,
            color.w
        )
    }

    /// Parse a wire string back into a command.
    ///
    /// Inverse of [`CommandEncoder::encode`] over everything `encode`
    /// produces. Unknown keywords and instruction codes fail with a
    /// configuration error.
    pub fn parse(wire: &str) -> Result<Command> {
        match wire {
            "CLEAR" => return Ok(Command::Clear),
            "SHOW" => return Ok(Command::Show),
            "RAW" => return Ok(Command::Raw),
            "DEBUG" => return Ok(Command::Debug),
            "STATE" => return Ok(Command::State),
            "UDP" => return Ok(Command::Udp),
            _ => {}
        }

        let (code, rest) = wire
            .split_once(':')
            .ok_or_else(|| Error::Configuration(format!("unknown instruction {wire:?}")))?;
        let code: u8 = code
            .parse()
            .map_err(|_| Error::Configuration(format!("bad instruction code in {wire:?}")))?;

        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() != 7 {
            return Err(Error::Configuration(format!(
                "expected 7 instruction fields, got {} in {wire:?}",
                fields.len()
            )));
        }
        let start: u16 = Self::field(fields[0], wire)?;
        let end: u16 = Self::field(fields[1], wire)?;
        let draw = Self::field::<u8>(fields[2], wire)? != 0;
        let color = Color::rgbw(
            Self::field(fields[3], wire)?,
            Self::field(fields[4], wire)?,
            Self::field(fields[5], wire)?,
            Self::field(fields[6], wire)?,
        );

        match code {
            OP_SET_PIXEL => Ok(Command::SetPixel {
                index: start,
                color,
                draw,
            }),
            OP_SET_LINE => Ok(Command::SetLine {
                start,
                end,
                color,
                draw,
            }),
            OP_SET_STRIP => Ok(Command::SetStrip { color, draw }),
            OP_SET_STRIP_WHITE => Ok(Command::SetStripWhite {
                white: color.w,
                draw,
            }),
            OP_GPIO_PIN_MODE => Ok(Command::GpioPinMode {
                pin: Self::pin(start, wire)?,
                output: end != 0,
            }),
            OP_GPIO_PIN_STATE => Ok(Command::GpioPinState {
                pin: Self::pin(start, wire)?,
                high: end != 0,
            }),
            other => Err(Error::Configuration(format!(
                "unknown instruction code {other} in {wire:?}"
            ))),
        }
    }

    fn field<T: std::str::FromStr>(raw: &str, wire: &str) -> Result<T> {
        raw.parse()
            .map_err(|_| Error::Configuration(format!("bad instruction field {raw:?} in {wire:?}")))
    }

    fn pin(value: u16, wire: &str) -> Result<u8> {
        u8::try_from(value)
            .map_err(|_| Error::Configuration(format!("GPIO number {value} out of range in {wire:?}")))
    }
}
