//! Set the system time by reading from a serially-attached GPS device.
//!
//! Everything the library treats as an external collaborator lives here:
//! option handling, serial line configuration, the read loop and the final
//! `clock_settime(2)` commit. One good fix and we are done.

extern crate env_logger;
extern crate gps_time;
extern crate libc;
#[macro_use]
extern crate log;

use std::env;
use std::fs::File;
use std::io;
use std::mem;
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;

use gps_time::{RmcParser, RmcTimestamp};

const DEFAULT_DEVICE: &'static str = "/dev/ttyu0";
const DEFAULT_BAUD: u32 = 9600;

fn main() {
    let mut device = String::from(DEFAULT_DEVICE);
    let mut baud = DEFAULT_BAUD;
    let mut verbose = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" => match args.next().and_then(|v| v.parse().ok()) {
                Some(v) => baud = v,
                None => usage(),
            },
            "-l" => match args.next() {
                Some(v) => device = v,
                None => usage(),
            },
            "-v" => verbose = true,
            _ => usage(),
        }
    }

    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    debug!("GPS device: {}, speed: {}", device, baud);

    let port = match File::open(&device) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("gps_time: {}: {}", device, e);
            process::exit(1);
        }
    };
    debug!("setting serial I/O parameters");
    if let Err(e) = configure_serial(port.as_raw_fd(), baud) {
        eprintln!("gps_time: {}: {}", device, e);
        process::exit(1);
    }

    let mut parser = RmcParser::new(port);
    match parser.next_fix() {
        Ok(Some(fix)) => {
            debug!("setting time to {}", fix.utc);
            if let Err(e) = set_system_clock(&fix) {
                eprintln!("gps_time: clock_settime: {}", e);
                process::exit(1);
            }
            info!("time set successfully, operation complete");
        }
        Ok(None) => debug!("GPS feed ended without a usable fix"),
        Err(e) => {
            eprintln!("gps_time: {}: {}", device, e);
            process::exit(1);
        }
    }
}

/// Raw 8N1 input at the requested speed, one byte at a time.
fn configure_serial(fd: RawFd, baud: u32) -> io::Result<()> {
    let speed = match baud_constant(baud) {
        Some(s) => s,
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid baud rate: {}", baud),
            ))
        }
    };
    unsafe {
        let mut tios: libc::termios = mem::zeroed();
        if libc::tcgetattr(fd, &mut tios) < 0 {
            return Err(io::Error::last_os_error());
        }
        tios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::ICRNL
            | libc::INLCR
            | libc::PARMRK
            | libc::INPCK
            | libc::ISTRIP
            | libc::IXON);
        tios.c_oflag = 0;
        tios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::IEXTEN | libc::ISIG);
        tios.c_cflag &= !(libc::CSIZE | libc::PARENB);
        tios.c_cflag |= libc::CS8;
        tios.c_cc[libc::VMIN] = 1;
        tios.c_cc[libc::VTIME] = 0;
        if libc::cfsetispeed(&mut tios, speed) < 0 || libc::cfsetospeed(&mut tios, speed) < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &tios) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Translate a baud rate into the kernel's B-number.
fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    match baud {
        50 => Some(libc::B50),
        75 => Some(libc::B75),
        110 => Some(libc::B110),
        134 => Some(libc::B134),
        150 => Some(libc::B150),
        200 => Some(libc::B200),
        300 => Some(libc::B300),
        600 => Some(libc::B600),
        1200 => Some(libc::B1200),
        1800 => Some(libc::B1800),
        2400 => Some(libc::B2400),
        4800 => Some(libc::B4800),
        9600 => Some(libc::B9600),
        19200 => Some(libc::B19200),
        38400 => Some(libc::B38400),
        57600 => Some(libc::B57600),
        115200 => Some(libc::B115200),
        230400 => Some(libc::B230400),
        _ => None,
    }
}

/// Commit the decoded fix to the system clock.
fn set_system_clock(fix: &RmcTimestamp) -> io::Result<()> {
    let ts = libc::timespec {
        tv_sec: fix.epoch_seconds() as libc::time_t,
        tv_nsec: fix.subsec_millis() as libc::c_long * 1_000_000,
    };
    if unsafe { libc::clock_settime(libc::CLOCK_REALTIME, &ts) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage: gps_time [-s 9600][-l /dev/ttyu0][-v]");
    process::exit(2);
}
