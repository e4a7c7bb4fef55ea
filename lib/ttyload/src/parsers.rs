//! String parsers for the command line flags.

use serial::core::{BaudRate, CharSize, FlowControl, StopBits};

pub fn parse_baud_rate(s: &str) -> Result<BaudRate, String> {
    s.parse::<usize>()
        .map(BaudRate::from_speed)
        .map_err(|e| e.to_string())
}

pub fn parse_width(s: &str) -> Result<CharSize, String> {
    match s {
        "5" => Ok(CharSize::Bits5),
        "6" => Ok(CharSize::Bits6),
        "7" => Ok(CharSize::Bits7),
        "8" => Ok(CharSize::Bits8),
        _ => Err("char width must be 5, 6, 7, or 8".to_string()),
    }
}

pub fn parse_stop_bits(s: &str) -> Result<StopBits, String> {
    match s {
        "1" => Ok(StopBits::Stop1),
        "2" => Ok(StopBits::Stop2),
        _ => Err("stop bits must be 1 or 2".to_string()),
    }
}

pub fn parse_flow_control(s: &str) -> Result<FlowControl, String> {
    match s {
        "none" => Ok(FlowControl::FlowNone),
        "software" => Ok(FlowControl::FlowSoftware),
        "hardware" => Ok(FlowControl::FlowHardware),
        _ => Err("flow control must be none, software, or hardware".to_string()),
    }
}

/// Parses a load address: hex digits, with or without a leading `0x`.
pub fn parse_address(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| e.to_string())
}
