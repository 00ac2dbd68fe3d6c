//! This module provides a decoder for the *RMC* sentence of the *NMEA 0183*
//! protocol, and the pipeline that drives a [Framer](../framer/struct.Framer.html)
//! over a byte source until the first usable fix.
//!
//! Numeric subfields are decoded with a deliberately lenient fixed-width
//! policy: digits are consumed left to right and a non-digit simply truncates
//! the value rather than raising an error. A sentence that got this far has
//! already passed its checksum, so strictness buys nothing on a noisy
//! RF-backed feed.

use arrayvec::ArrayVec;
use chrono::{DateTime, NaiveDate, Utc};

use std::io::{self, Read};

use err::DecodeError;
use framer::Framer;

/// Talker and type identifier of the one sentence kind we decode.
const RMC_HEADER: &'static [u8] = b"GPRMC";

/// An RMC sentence has exactly this many comma-separated fields. Anything
/// else is malformed, whatever its checksum says.
const RMC_FIELD_COUNT: usize = 13;

/// Upper bound on the field split; bounds allocation for garbage input.
const MAX_FIELDS: usize = 20;

/// Two-digit years are resolved against this century. Hard-coded 20xx,
/// which holds until 2100.
const CENTURY: i32 = 2000;

/// A validated UTC timestamp decoded from one RMC sentence.
///
/// Only constructed after the checksum and the field count have both been
/// verified. Decoding is a pure function of the sentence bytes, so the
/// same sentence always yields an equal `RmcTimestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmcTimestamp {
    /// The decoded calendar time, millisecond precision.
    pub utc: DateTime<Utc>,
}

impl RmcTimestamp {
    /// Seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.utc.timestamp()
    }

    /// Milliseconds past the whole second.
    pub fn subsec_millis(&self) -> u32 {
        self.utc.timestamp_subsec_millis()
    }
}

/// Decode one framed sentence into a timestamp.
///
/// The pipeline short-circuits at the first failure: type filter, checksum
/// scan, checksum verify, field split and count, time/date decode. Every
/// failure is a skip-this-sentence outcome, reported through
/// [DecodeError](../err/enum.DecodeError.html) for diagnostics only.
pub fn decode(sentence: &[u8]) -> Result<RmcTimestamp, DecodeError> {
    if sentence.len() < RMC_HEADER.len() || &sentence[..RMC_HEADER.len()] != RMC_HEADER {
        return Err(DecodeError::UnexpectedSentenceType);
    }

    let (body, embedded) = split_checksum(sentence)?;
    let computed = body.iter().fold(0u8, |sum, &b| sum ^ b);
    if embedded != u32::from(computed) {
        return Err(DecodeError::InvalidChecksum(computed, embedded));
    }
    debug!("checksum is good");

    let fields = split_fields(body);
    if fields.len() != RMC_FIELD_COUNT {
        return Err(DecodeError::FieldCount(fields.len()));
    }

    // Field 1 is `HHMMSS[.sss]` time of day, field 9 is `DDMMYY`.
    let time = fields[1];
    let date = fields[9];
    debug!(
        "GPS time: {}, date: {}",
        String::from_utf8_lossy(time),
        String::from_utf8_lossy(date)
    );

    let hour = decimal(time, 0, 2);
    let minute = decimal(time, 2, 2);
    let second = decimal(time, 4, 2);
    // Milliseconds sit past the decimal dot at offset 6, when present.
    let millis = decimal(time, 7, 3);

    let day = decimal(date, 0, 2);
    let month = decimal(date, 2, 2);
    let year = CENTURY + decimal(date, 4, 2) as i32;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis))
        .ok_or(DecodeError::InvalidCalendar)?;

    Ok(RmcTimestamp {
        utc: DateTime::from_utc(naive, Utc),
    })
}

/// Split `sentence` at the `*` delimiter into the checksummed body and the
/// embedded checksum value. No `*` means the sentence is malformed.
fn split_checksum(sentence: &[u8]) -> Result<(&[u8], u32), DecodeError> {
    let star = sentence
        .iter()
        .position(|&b| b == b'*')
        .ok_or(DecodeError::MissingChecksum)?;
    Ok((&sentence[..star], hex_value(&sentence[star + 1..])))
}

/// Fold leading hex digits into a value, `strtol` style: zero digits yield
/// 0, surplus digits keep accumulating. Either way a malformed suffix can
/// only fail the checksum comparison, never parse into a false match.
fn hex_value(digits: &[u8]) -> u32 {
    let mut value: u32 = 0;
    for &b in digits {
        match (b as char).to_digit(16) {
            Some(d) => value = value.saturating_mul(16).saturating_add(d),
            None => break,
        }
    }
    value
}

/// Split `body` on commas into at most [MAX_FIELDS](constant.MAX_FIELDS.html)
/// fields. Leading ASCII whitespace of a field is skipped and a trailing
/// empty field after a final comma is not counted.
fn split_fields(body: &[u8]) -> ArrayVec<[&[u8]; MAX_FIELDS]> {
    let mut fields = ArrayVec::new();
    let mut rest = body;
    while fields.len() < MAX_FIELDS {
        while let Some((&c, tail)) = rest.split_first() {
            if !c.is_ascii_whitespace() {
                break;
            }
            rest = tail;
        }
        if rest.is_empty() {
            break;
        }
        match rest.iter().position(|&c| c == b',') {
            Some(comma) => {
                fields.push(&rest[..comma]);
                rest = &rest[comma + 1..];
                if rest.is_empty() {
                    break;
                }
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

/// Lenient fixed-width decimal decode: consume up to `width` decimal digits
/// of `field` starting at `offset`, accumulating base 10. A non-digit stops
/// the scan and truncates the value; an offset past the end of the field
/// yields 0. Intentional permissiveness, not an accident.
fn decimal(field: &[u8], offset: usize, width: usize) -> u32 {
    let mut value = 0u32;
    for &b in field.iter().skip(offset).take(width) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10 + u32::from(b - b'0');
    }
    value
}

/// Drives a [Framer](../framer/struct.Framer.html) over a byte source and
/// decodes framed sentences until one passes.
///
/// Also an `Iterator` over every decodable fix in the stream, so callers
/// can take the first fix, retry, or average several without the pipeline
/// caring.
#[derive(Debug)]
pub struct RmcParser<R: io::Read> {
    input: io::Bytes<R>,
    framer: Framer,
}

impl<R: io::Read> RmcParser<R> {
    /// Create a parser reading from `input`.
    pub fn new(input: R) -> Self {
        RmcParser {
            input: input.bytes(),
            framer: Framer::new(),
        }
    }

    /// Pump bytes until the first decodable RMC sentence.
    ///
    /// `Ok(None)` means the source ran dry without a usable fix. Rejected
    /// sentences are logged and skipped; only transport errors surface.
    pub fn next_fix(&mut self) -> Result<Option<RmcTimestamp>, io::Error> {
        while let Some(byte) = self.input.next() {
            let sentence = match self.framer.feed(byte?) {
                Some(s) => s,
                None => continue,
            };
            debug!("GPS: [{}]", String::from_utf8_lossy(&sentence));
            match decode(&sentence) {
                Ok(fix) => return Ok(Some(fix)),
                Err(reject) => debug!("{} - ignoring", reject),
            }
        }
        Ok(None)
    }
}

impl<R: io::Read> Iterator for RmcParser<R> {
    type Item = Result<RmcTimestamp, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_fix() {
            Ok(Some(fix)) => Some(Ok(fix)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
