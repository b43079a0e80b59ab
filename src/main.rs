// main.rs      gifrec command
//
// Copyright (c) 2026  gifrec authors
//
#![forbid(unsafe_code)]

use clap::{App, Arg};
use gifrec::Encoder;
use pix::rgb::SRgba8;
use pix::Raster;
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print an error message in red and exit
fn fail(msg: &str) -> Result<(), Box<dyn Error>> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    write!(stderr, "error")?;
    stderr.reset()?;
    writeln!(stderr, ": {}", msg)?;
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let matches = App::new("gifrec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Encode raw RGBA frames into an animated GIF")
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .required(true)
                .help("frame width in pixels"),
        )
        .arg(
            Arg::with_name("height")
                .short("h")
                .long("height")
                .takes_value(true)
                .required(true)
                .help("frame height in pixels"),
        )
        .arg(
            Arg::with_name("delay")
                .short("d")
                .long("delay")
                .takes_value(true)
                .default_value("100")
                .help("delay between frames, in milliseconds"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("out.gif")
                .help("output GIF file"),
        )
        .arg(
            Arg::with_name("FRAME")
                .multiple(true)
                .required(true)
                .help("raw RGBA frame file (width * height * 4 bytes)"),
        )
        .get_matches();
    let width: u32 = matches.value_of("width").unwrap().parse()?;
    let height: u32 = matches.value_of("height").unwrap().parse()?;
    let delay: u32 = matches.value_of("delay").unwrap().parse()?;
    let output = matches.value_of("output").unwrap();
    let mut enc = Encoder::new(width, height)?.with_delay_ms(delay);
    let frame_sz = width as usize * height as usize * 4;
    for path in matches.values_of("FRAME").unwrap() {
        let data = fs::read(path)?;
        if data.len() != frame_sz {
            fail(&format!(
                "{}: expected {} bytes, found {}",
                path,
                frame_sz,
                data.len()
            ))?;
        }
        let raster = Raster::<SRgba8>::with_u8_buffer(width, height, data);
        enc.add_frame(raster)?;
    }
    enc.encode(File::create(output)?)?;
    Ok(())
}
