pub const TRACK_COUNT: usize = 3;
pub const TRACK_LENGTH_OFFSETS: [usize; TRACK_COUNT] = [3, 4, 5];
pub const ENCODING_TYPE_OFFSET: usize = 6;
pub const TRACK_DATA_OFFSET: usize = 9;

pub const SENTINEL_CHARS: [char; 5] = ['\u{10}', '\t', '\n', '\r', '\0'];

/// Total bytes in a complete swipe frame, the device's maximum frame size.
pub const COMPLETE_SWIPE_LEN: usize = 537;

pub const MIN_LEN: usize = TRACK_DATA_OFFSET;
