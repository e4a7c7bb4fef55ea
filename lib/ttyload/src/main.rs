mod encode;
mod parsers;

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use serial::core::{BaudRate, CharSize, FlowControl, StopBits};
use serial::prelude::*;
use structopt::StructOpt;

use hexload::IMAGE_BASE;

use crate::parsers::{
    parse_address, parse_baud_rate, parse_flow_control, parse_stop_bits, parse_width,
};

#[derive(StructOpt, Debug)]
#[structopt(about = "Uploads a binary image to the serial boot ROM")]
struct Opt {
    #[structopt(help = "Path to TTY device", parse(from_os_str))]
    tty_path: PathBuf,

    #[structopt(
        short = "i",
        long = "input",
        help = "Input file (defaults to stdin)",
        parse(from_os_str)
    )]
    input: Option<PathBuf>,

    #[structopt(
        short = "a",
        long = "address",
        help = "Load address in hex (defaults to the 64 KiB image base)",
        parse(try_from_str = parse_address)
    )]
    address: Option<u32>,

    #[structopt(long = "no-address", help = "Send no address-set command")]
    no_address: bool,

    #[structopt(
        short = "r",
        long = "run",
        help = "Send the run byte after the image"
    )]
    run: bool,

    #[structopt(
        short = "b",
        long = "baud",
        help = "Baud rate",
        default_value = "115200",
        parse(try_from_str = parse_baud_rate)
    )]
    baud_rate: BaudRate,

    #[structopt(
        short = "w",
        long = "width",
        help = "Character width",
        default_value = "8",
        parse(try_from_str = parse_width)
    )]
    char_width: CharSize,

    #[structopt(
        long = "stop-bits",
        help = "Stop bits",
        default_value = "1",
        parse(try_from_str = parse_stop_bits)
    )]
    stop_bits: StopBits,

    #[structopt(
        long = "flow-control",
        help = "Flow control ('none', 'software', or 'hardware')",
        default_value = "none",
        parse(try_from_str = parse_flow_control)
    )]
    flow_control: FlowControl,
}

fn main() {
    let opt = Opt::from_args();

    let mut port = serial::open(&opt.tty_path).expect("path points to an invalid TTY");
    port.configure(&serial::PortSettings {
        baud_rate: opt.baud_rate,
        char_size: opt.char_width,
        parity: serial::ParityNone,
        stop_bits: opt.stop_bits,
        flow_control: opt.flow_control,
    })
    .expect("TTY rejected the settings");
    port.set_timeout(Duration::from_secs(10))
        .expect("TTY rejected the timeout");

    let address = if opt.no_address {
        None
    } else {
        Some(opt.address.unwrap_or(IMAGE_BASE))
    };

    let sent = match opt.input {
        Some(ref path) => {
            let file = File::open(path).expect("input file is unreadable");
            encode::encode(BufReader::new(file), &mut port, address, opt.run)
        }
        None => {
            let stdin = io::stdin();
            let locked = stdin.lock();
            encode::encode(locked, &mut port, address, opt.run)
        }
    }
    .expect("transfer failed");

    match address {
        Some(addr) => println!("wrote {} bytes at {:#010x}", sent, addr),
        None => println!("wrote {} bytes", sent),
    }
}
