#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate gps_time;

use std::io::Cursor;
use gps_time::RmcParser;

fuzz_target!(|data: &[u8]| {
    let parser = RmcParser::new(Cursor::new(data));

    for _ in parser {
        ();
    }
});
