//! Masked-field parsers and parameter tokenization.
//!
//! Command handlers receive the raw input line and pull typed values out of
//! it with [`get_param`] plus one of the masked parsers. All parsers share a
//! single segment algorithm: digits accumulate into the current segment, the
//! segment's separator closes it with a range check, and any other byte fails
//! the parse. The final segment is range checked at end of input.

/// One segment of a field mask.
#[derive(Debug, Clone, Copy)]
pub struct MaskSeg {
    /// Inclusive lower bound of the segment value.
    pub min: u32,
    /// Inclusive upper bound of the segment value.
    pub max: u32,
    /// Byte that closes this segment; `None` for the final segment.
    pub separator: Option<u8>,
    /// Accumulate digits in base 16 instead of base 10.
    pub hex: bool,
}

impl MaskSeg {
    const fn dec(min: u32, max: u32, separator: Option<u8>) -> Self {
        Self { min, max, separator, hex: false }
    }

    const fn hex(min: u32, max: u32, separator: Option<u8>) -> Self {
        Self { min, max, separator, hex: true }
    }
}

/// Parse `input` against an ordered segment mask.
///
/// Returns the segment values on success. Fails on any byte that is neither
/// a digit of the segment's base nor the segment's separator, on any value
/// outside its range, and on input that ends before the final segment.
pub fn parse_masked<const N: usize>(input: &str, mask: &[MaskSeg; N]) -> Option<[u32; N]> {
    let mut values = [0u32; N];
    let mut seg = 0;

    for &byte in input.as_bytes() {
        let base = if mask[seg].hex { 16 } else { 10 };
        if let Some(digit) = (byte as char).to_digit(base) {
            values[seg] = values[seg].wrapping_mul(base).wrapping_add(digit);
            continue;
        }
        match mask[seg].separator {
            Some(sep) if byte == sep => {
                if values[seg] < mask[seg].min || values[seg] > mask[seg].max {
                    return None;
                }
                seg += 1;
            }
            _ => return None,
        }
    }

    // All separators must have been consumed.
    if seg != N - 1 {
        return None;
    }
    if values[seg] < mask[seg].min || values[seg] > mask[seg].max {
        return None;
    }
    Some(values)
}

/// Parse a MAC address of the form `aa:bb:cc:dd:ee:ff` (hex, case-insensitive).
pub fn parse_mac(input: &str) -> Option<[u8; 6]> {
    const MASK: [MaskSeg; 6] = [
        MaskSeg::hex(0, 255, Some(b':')),
        MaskSeg::hex(0, 255, Some(b':')),
        MaskSeg::hex(0, 255, Some(b':')),
        MaskSeg::hex(0, 255, Some(b':')),
        MaskSeg::hex(0, 255, Some(b':')),
        MaskSeg::hex(0, 255, None),
    ];
    let v = parse_masked(input, &MASK)?;
    Some([v[0] as u8, v[1] as u8, v[2] as u8, v[3] as u8, v[4] as u8, v[5] as u8])
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_ipv4(input: &str) -> Option<[u8; 4]> {
    const MASK: [MaskSeg; 4] = [
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, None),
    ];
    let v = parse_masked(input, &MASK)?;
    Some([v[0] as u8, v[1] as u8, v[2] as u8, v[3] as u8])
}

/// Parse a server endpoint `a.b.c.d:port` with an unprivileged port
/// (1024-65535).
pub fn parse_server_addr(input: &str) -> Option<([u8; 4], u16)> {
    const MASK: [MaskSeg; 5] = [
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, Some(b'.')),
        MaskSeg::dec(0, 255, Some(b':')),
        MaskSeg::dec(1024, 65535, None),
    ];
    let v = parse_masked(input, &MASK)?;
    Some(([v[0] as u8, v[1] as u8, v[2] as u8, v[3] as u8], v[4] as u16))
}

/// Parse a single decimal integer with a caller-supplied inclusive range.
pub fn parse_int(input: &str, min: u32, max: u32) -> Option<u32> {
    let mask = [MaskSeg::dec(min, max, None)];
    let v = parse_masked(input, &mask)?;
    Some(v[0])
}

/// Parse a date as `dd/mm/yyyy` (2020-2080) or `dd/mm/yy` (20-80, taken as
/// 20xx). Returns `(day, month, year)` with a four-digit year.
pub fn parse_date(input: &str) -> Option<(u32, u32, u32)> {
    const LONG: [MaskSeg; 3] = [
        MaskSeg::dec(1, 31, Some(b'/')),
        MaskSeg::dec(1, 12, Some(b'/')),
        MaskSeg::dec(2020, 2080, None),
    ];
    const SHORT: [MaskSeg; 3] = [
        MaskSeg::dec(1, 31, Some(b'/')),
        MaskSeg::dec(1, 12, Some(b'/')),
        MaskSeg::dec(20, 80, None),
    ];
    if let Some(v) = parse_masked(input, &LONG) {
        return Some((v[0], v[1], v[2]));
    }
    let v = parse_masked(input, &SHORT)?;
    Some((v[0], v[1], v[2] + 2000))
}

/// Parse a time of day as `HH:MM` or `HH:MM:SS`. Returns
/// `(hour, minute, second)`; seconds are zero for the short form.
pub fn parse_time(input: &str) -> Option<(u32, u32, u32)> {
    const SHORT: [MaskSeg; 2] = [
        MaskSeg::dec(0, 23, Some(b':')),
        MaskSeg::dec(0, 59, None),
    ];
    const LONG: [MaskSeg; 3] = [
        MaskSeg::dec(0, 23, Some(b':')),
        MaskSeg::dec(0, 59, Some(b':')),
        MaskSeg::dec(0, 59, None),
    ];
    if let Some(v) = parse_masked(input, &SHORT) {
        return Some((v[0], v[1], 0));
    }
    let v = parse_masked(input, &LONG)?;
    Some((v[0], v[1], v[2]))
}

/// Number of parameters following the command word.
///
/// Counts transitions into runs of spaces; a trailing space run does not
/// start a parameter, so it is not counted.
pub fn param_count(line: &str) -> usize {
    let mut count = 0usize;
    let mut in_space = false;
    for byte in line.bytes() {
        if byte == b' ' {
            if !in_space {
                count += 1;
                in_space = true;
            }
        } else {
            in_space = false;
        }
    }
    if in_space {
        count = count.saturating_sub(1);
    }
    count
}

/// The `index`-th parameter of the line, 1-based. Index zero addresses the
/// command word itself and always returns `None`.
pub fn get_param(line: &str, index: usize) -> Option<&str> {
    if index == 0 {
        return None;
    }
    line.split(' ').filter(|t| !t.is_empty()).nth(index)
}
