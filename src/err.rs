quick_error! {
    /// Why a candidate sentence was not usable.
    ///
    /// Every variant is a non-fatal, skip-this-sentence outcome. The
    /// categories exist for diagnostics only; callers must not branch on
    /// them, they just wait for the next sentence.
    #[derive(Debug)]
    pub enum DecodeError {
        UnexpectedSentenceType {
            description("Unexpected sentence type")
            display("Waiting for an RMC message - ignoring this one")
        }
        MissingChecksum {
            description("Missing checksum")
            display("Badly formed NMEA sentence")
        }
        InvalidChecksum(computed: u8, embedded: u32) {
            description("Invalid checksum")
            display("Invalid checksum: computed \"{:02X}\", sentence carries \"{:02X}\"", computed, embedded)
        }
        FieldCount(count: usize) {
            description("Incorrect RMC field count")
            display("Incorrect number of RMC parameters in sentence: {}", count)
        }
        InvalidCalendar {
            description("Unrepresentable calendar value")
            display("Decoded time and date fields do not form a valid UTC timestamp")
        }
    }
}
