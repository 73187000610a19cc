//! Options fragment decoding (`400x300`, `300, repeat`, ...)

use serde::Serialize;

/// Position and repeat options decoded from an alias or `#` fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropertyOptions {
    /// Horizontal offset in pixels
    pub x: i64,

    /// Vertical offset in pixels
    pub y: i64,

    /// Tile the image instead of covering the banner
    pub repeatable: bool,
}

/// Decode an options fragment.
///
/// The fragment is split on `x` and `,`; parts that start with an integer
/// count as numbers. Two numbers are `x` and `y`. A single number is `y`
/// only (height-only sizing), any other count leaves both at zero.
pub fn decode_options(fragment: &str) -> PropertyOptions {
    let repeatable = fragment.to_lowercase().contains("repeat");

    let numbers: Vec<i64> = fragment
        .split(|c| c == 'x' || c == ',')
        .filter_map(leading_integer)
        .collect();

    let (x, y) = match numbers.as_slice() {
        [x, y] => (*x, *y),
        [y] => (0, *y),
        _ => (0, 0),
    };

    PropertyOptions { x, y, repeatable }
}

/// Parse the integer at the start of a trimmed part (`" 200px"` is 200).
/// Values that overflow are treated as not numeric.
fn leading_integer(part: &str) -> Option<i64> {
    let part = part.trim();
    let digits_start = usize::from(part.starts_with(['+', '-']));
    let digits_len = part[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits_len == 0 {
        return None;
    }

    part[..digits_start + digits_len]
        .trim_start_matches('+')
        .parse()
        .ok()
}
