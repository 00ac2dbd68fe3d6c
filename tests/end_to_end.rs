//! Full pipeline over a simulated serial feed: bytes in, one fix out.

#[macro_use]
extern crate assert_matches;
extern crate chrono;
extern crate gps_time;

use chrono::{TimeZone, Utc};
use std::io::Cursor;

use gps_time::RmcParser;

const VALID_LINE: &'static [u8] =
    b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W,A*07\r\n";

#[test]
fn first_fix_from_noisy_feed() {
    let mut feed = Vec::new();
    // Line noise, then sentence types we ignore, then the one we want.
    feed.extend_from_slice(b"\x00\x7f\xfe@@@garbage\r\n");
    feed.extend_from_slice(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n");
    feed.extend_from_slice(b"$GPVTG,084.4,T,077.8,M,022.4,N,041.5,K*43\r\n");
    feed.extend_from_slice(VALID_LINE);

    let mut parser = RmcParser::new(Cursor::new(feed));
    let fix = parser.next_fix().unwrap().expect("no fix decoded");
    assert_eq!(fix.utc, Utc.ymd(2094, 3, 23).and_hms_milli(12, 35, 19, 0));
    assert_eq!(fix.subsec_millis(), 0);
}

#[test]
fn one_fix_per_decode_even_with_more_data_behind() {
    // A caller that stops at the first fix never observes the later ones.
    let mut feed = Vec::new();
    feed.extend_from_slice(b"\r\n");
    feed.extend_from_slice(VALID_LINE);
    feed.extend_from_slice(b"$GPRMC,235959.999,A,0000.000,N,00000.000,E,0.0,0.0,311299,,,A*67\r\n");

    let mut parser = RmcParser::new(Cursor::new(feed));
    let first = parser.next_fix().unwrap().unwrap();
    assert_eq!(first.utc, Utc.ymd(2094, 3, 23).and_hms_milli(12, 35, 19, 0));

    // The pipeline stays composable: the same parser can keep going.
    let second = parser.next_fix().unwrap().unwrap();
    assert_eq!(second.utc, Utc.ymd(2099, 12, 31).and_hms_milli(23, 59, 59, 999));
    assert_matches!(parser.next_fix(), Ok(None));
}

#[test]
fn truncated_sentence_yields_nothing() {
    // Unterminated sentence up to the size cap, then EOF.
    let mut feed = b"\r\n$GPRM".to_vec();
    feed.extend(vec![b'C'; 600]);

    let mut parser = RmcParser::new(Cursor::new(feed));
    assert_matches!(parser.next_fix(), Ok(None));
}

#[test]
fn iterator_view_collects_every_fix() {
    let mut feed = Vec::new();
    feed.extend_from_slice(b"\r\n");
    feed.extend_from_slice(VALID_LINE);
    feed.extend_from_slice(VALID_LINE);

    let fixes: Vec<_> = RmcParser::new(Cursor::new(feed))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(fixes.len(), 2);
    assert_eq!(fixes[0], fixes[1]);
}
