//! Derives a UTC timestamp from the NMEA 0183 feed of a serially-attached
//! GPS receiver.
//!
//! The crate frames the raw byte stream into candidate sentences
//! ([framer](framer/index.html)), then validates and decodes `GPRMC`
//! sentences into timestamps ([parser](parser/index.html)). Everything
//! else on the wire is ignored; corruption is survived by checksum and
//! resynchronization, never by aborting.
//!
//! ```no_run
//! use std::fs::File;
//! use gps_time::RmcParser;
//!
//! let port = File::open("/dev/ttyu0").unwrap();
//! if let Ok(Some(fix)) = RmcParser::new(port).next_fix() {
//!     println!("GPS says it is {}", fix.utc);
//! }
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate arrayvec;
extern crate chrono;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

pub mod err;
pub mod framer;
pub mod parser;

pub use err::DecodeError;
pub use framer::{Framer, Sentence, MAX_SENTENCE_LEN};
pub use parser::{decode, RmcParser, RmcTimestamp};
