//! Protocol parsing and serialization tests

use esp_rgbw_ws::protocol::command::{Command, CommandEncoder};
use esp_rgbw_ws::protocol::event::{DecodedFrame, FrameDecoder};
use esp_rgbw_ws::protocol::packet::{PacketBuilder, UdpOpcode, BULK_FRAME_HEADER};
use esp_rgbw_ws::{Color, Error, PinMapping, UNKNOWN_PIN_LABEL};

#[test]
fn test_set_pixel_encoding() {
    let command = Command::SetPixel {
        index: 4,
        color: Color::rgbw(10, 20, 30, 40),
        draw: true,
    };
    assert_eq!(CommandEncoder::encode(&command), "0:4,0,1,10,20,30,40");
}

#[test]
fn test_set_line_encoding() {
    let command = Command::SetLine {
        start: 3,
        end: 12,
        color: Color::rgbw(255, 0, 128, 0),
        draw: false,
    };
    assert_eq!(CommandEncoder::encode(&command), "1:3,12,0,255,0,128,0");
}

#[test]
fn test_set_strip_encoding() {
    let command = Command::SetStrip {
        color: Color::named("cyan"),
        draw: true,
    };
    assert_eq!(CommandEncoder::encode(&command), "2:0,0,1,0,255,255,0");
}

#[test]
fn test_set_strip_white_encoding() {
    let command = Command::SetStripWhite {
        white: 200,
        draw: true,
    };
    assert_eq!(CommandEncoder::encode(&command), "3:0,0,1,0,0,0,200");
}

#[test]
fn test_gpio_encoding() {
    let mode = Command::GpioPinMode {
        pin: 8,
        output: true,
    };
    assert_eq!(CommandEncoder::encode(&mode), "8:8,1,0,0,0,0,0");

    let state = Command::GpioPinState { pin: 5, high: false };
    assert_eq!(CommandEncoder::encode(&state), "9:5,0,0,0,0,0,0");
}

#[test]
fn test_plain_keywords_ignore_parameters() {
    assert_eq!(CommandEncoder::encode(&Command::Clear), "CLEAR");
    assert_eq!(CommandEncoder::encode(&Command::Show), "SHOW");
    assert_eq!(CommandEncoder::encode(&Command::Raw), "RAW");
    assert_eq!(CommandEncoder::encode(&Command::Debug), "DEBUG");
    assert_eq!(CommandEncoder::encode(&Command::State), "STATE");
    assert_eq!(CommandEncoder::encode(&Command::Udp), "UDP");
}

#[test]
fn test_numeric_round_trip() {
    let commands = [
        Command::SetPixel {
            index: 17,
            color: Color::rgbw(1, 2, 3, 4),
            draw: true,
        },
        Command::SetLine {
            start: 0,
            end: 299,
            color: Color::rgbw(255, 255, 255, 255),
            draw: false,
        },
        Command::SetStrip {
            color: Color::named("orange"),
            draw: true,
        },
        Command::SetStripWhite {
            white: 64,
            draw: false,
        },
        Command::GpioPinMode {
            pin: 2,
            output: false,
        },
        Command::GpioPinState { pin: 7, high: true },
    ];
    for command in commands {
        let wire = CommandEncoder::encode(&command);
        assert_eq!(CommandEncoder::parse(&wire).unwrap(), command, "wire {wire:?}");
    }
}

#[test]
fn test_keyword_round_trip() {
    for command in [
        Command::Clear,
        Command::Show,
        Command::Raw,
        Command::Debug,
        Command::State,
        Command::Udp,
    ] {
        let wire = CommandEncoder::encode(&command);
        assert_eq!(CommandEncoder::parse(&wire).unwrap(), command);
    }
}

#[test]
fn test_parse_rejects_unknown_instruction() {
    assert!(matches!(
        CommandEncoder::parse("FLASH"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        CommandEncoder::parse("4:1,2,3,4,5,6,7"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        CommandEncoder::parse("0:1,2,3"),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_pin_event_decode() {
    let pins = PinMapping::wemos_d1_r1();
    // D0 maps to GPIO 2 on the default board.
    assert_eq!(
        FrameDecoder::decode("7:2,1", &pins),
        DecodedFrame::Pin {
            label: "D0".to_string(),
            state: "1".to_string(),
        }
    );
}

#[test]
fn test_pin_event_unknown_gpio() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("7:42,0", &pins),
        DecodedFrame::Pin {
            label: UNKNOWN_PIN_LABEL.to_string(),
            state: "0".to_string(),
        }
    );
}

#[test]
fn test_pin_event_missing_state() {
    let pins = PinMapping::wemos_d1_r1();
    // No comma in the payload degrades to an empty state, never a panic.
    assert_eq!(
        FrameDecoder::decode("7:2", &pins),
        DecodedFrame::Pin {
            label: "D0".to_string(),
            state: String::new(),
        }
    );
}

#[test]
fn test_info_decode_partial() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("INFO:UDP.true,RAW.false", &pins),
        DecodedFrame::Info {
            udp: Some(true),
            raw: Some(false),
            debug: None,
        }
    );
}

#[test]
fn test_info_decode_ignores_unknown_keys() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("INFO:FOO.true,DEBUG.true,RAW.maybe", &pins),
        DecodedFrame::Info {
            udp: None,
            raw: None,
            debug: Some(true),
        }
    );
}

#[test]
fn test_error_event_decode() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("ERROR:8,short", &pins),
        DecodedFrame::Error {
            label: "D3".to_string(),
            detail: "short".to_string(),
        }
    );
}

#[test]
fn test_raw_decode_keeps_later_colons() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("RAW:a:b,c", &pins),
        DecodedFrame::Raw {
            payload: "a:b,c".to_string(),
        }
    );
}

#[test]
fn test_plain_message_fallback() {
    let pins = PinMapping::wemos_d1_r1();
    assert_eq!(
        FrameDecoder::decode("hello strip", &pins),
        DecodedFrame::Message {
            text: "hello strip".to_string(),
        }
    );
}

#[test]
fn test_bulk_frame_example() {
    let frame = PacketBuilder::build_bulk_frame(&[Color::rgbw(1, 2, 3, 4)]);
    // sum = 0xAA + 1 + 2 + 3 + 4 = 0xB4
    assert_eq!(frame, vec![0xAA, 1, 2, 3, 4, 0x00, 0xB4]);
}

#[test]
fn test_bulk_frame_checksum_split() {
    let colors = vec![Color::rgbw(255, 255, 255, 255); 100];
    let frame = PacketBuilder::build_bulk_frame(&colors);
    assert_eq!(frame.len(), 1 + 400 + 2);
    assert_eq!(frame[0], BULK_FRAME_HEADER);

    let sum: u32 = frame[..frame.len() - 2].iter().map(|&b| u32::from(b)).sum();
    assert!(sum > 0xFFFF, "test payload must overflow 16 bits");
    assert_eq!(frame[frame.len() - 2], ((sum >> 8) & 0xFF) as u8);
    assert_eq!(frame[frame.len() - 1], (sum & 0xFF) as u8);
}

#[test]
fn test_empty_bulk_frame() {
    // Header alone still gets a checksum.
    assert_eq!(PacketBuilder::build_bulk_frame(&[]), vec![0xAA, 0x00, 0xAA]);
}

#[test]
fn test_opcode_frames() {
    assert_eq!(PacketBuilder::build_opcode_frame(UdpOpcode::Udp), [0xAB, 0x00]);
    assert_eq!(
        PacketBuilder::build_opcode_frame(UdpOpcode::GetState),
        [0xAC, 0x00]
    );
}

#[test]
fn test_pin_mapping_round_trip() {
    let pins = PinMapping::wemos_d1_r1();
    for label in ["D0", "D1", "D2", "RX", "TX", "D3", "D5", "D6", "D7"] {
        let number = pins.number(label).unwrap();
        assert_eq!(pins.label(number), Some(label));
    }
    assert_eq!(pins.number("D4"), None);
    assert_eq!(pins.label(42), None);
}

#[test]
fn test_pin_mapping_by_name() {
    assert_eq!(
        PinMapping::by_name("WeMOSD1_R1").unwrap(),
        PinMapping::wemos_d1_r1()
    );
    assert!(matches!(
        PinMapping::by_name("NodeMCU_V9"),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_pin_mapping_rejects_duplicate_gpio() {
    let result = PinMapping::new("broken", &[("A", 1), ("B", 1)]);
    assert!(matches!(result, Err(Error::Configuration(_))));

    let result = PinMapping::new("broken", &[("A", 1), ("A", 2)]);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_named_colors() {
    assert_eq!(Color::named("magenta"), Color::rgbw(255, 0, 255, 0));
    assert_eq!(Color::named("orange"), Color::rgbw(255, 132, 0, 0));
    // Unrecognized names fall back to black.
    assert_eq!(Color::named("mauve"), Color::BLACK);
}
