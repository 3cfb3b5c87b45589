use super::layout::Out;
use super::text::{sealed, Formattable};
use crate::{DateTime, DateTimeOffset, Format, TimeSpan};

const DAY_NAMES: [&[u8; 3]; 7] = [b"Sun", b"Mon", b"Tue", b"Wed", b"Thu", b"Fri", b"Sat"];
const MONTH_NAMES: [&[u8; 3]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov", b"Dec",
];

// 12/31/9999 23:59:59
const GENERAL_LEN: usize = 19;
// 9999-12-31T23:59:59.9999999
const ROUND_TRIP_LEN: usize = 27;
// Fri, 31 Dec 9999 23:59:59 GMT
const RFC1123_LEN: usize = 29;
// +14:00
const OFFSET_LEN: usize = 6;
// -10675199.02:48:05.4775808
const TIME_SPAN_LEN: usize = 26;

fn write_time(out: &mut Out, value: DateTime) -> Option<()> {
    out.two_digits(value.hour())?;
    out.push(b':')?;
    out.two_digits(value.minute())?;
    out.push(b':')?;
    out.two_digits(value.second())
}

fn write_general(out: &mut Out, value: DateTime) -> Option<()> {
    let (year, month, day) = value.date();
    out.two_digits(month)?;
    out.push(b'/')?;
    out.two_digits(day)?;
    out.push(b'/')?;
    out.padded_digits(year.into(), 4)?;
    out.push(b' ')?;
    write_time(out, value)
}

fn write_round_trip(out: &mut Out, value: DateTime) -> Option<()> {
    let (year, month, day) = value.date();
    out.padded_digits(year.into(), 4)?;
    out.push(b'-')?;
    out.two_digits(month)?;
    out.push(b'-')?;
    out.two_digits(day)?;
    out.push(b'T')?;
    write_time(out, value)?;
    out.push(b'.')?;
    out.padded_digits(value.fraction().into(), 7)
}

fn write_rfc1123(out: &mut Out, value: DateTime, lower: bool) -> Option<()> {
    let start = out.len();
    let (year, month, day) = value.date();
    out.extend(DAY_NAMES[value.day_of_week() as usize])?;
    out.extend(b", ")?;
    out.two_digits(day)?;
    out.push(b' ')?;
    out.extend(MONTH_NAMES[month as usize - 1])?;
    out.push(b' ')?;
    out.padded_digits(year.into(), 4)?;
    out.push(b' ')?;
    write_time(out, value)?;
    out.extend(b" GMT")?;
    if lower {
        let end = out.len();
        out.buf_mut()[start..end].make_ascii_lowercase();
    }
    Some(())
}

fn write_offset(out: &mut Out, offset_minutes: i16) -> Option<()> {
    out.push(if offset_minutes < 0 { b'-' } else { b'+' })?;
    let offset = u32::from(offset_minutes.unsigned_abs());
    out.two_digits(offset / 60)?;
    out.push(b':')?;
    out.two_digits(offset % 60)
}

impl sealed::Sealed for DateTime {}

impl Formattable for DateTime {
    fn max_len(format: Format) -> Option<usize> {
        match format.symbol() {
            None | Some(b'G') => Some(GENERAL_LEN),
            Some(b'O') => Some(ROUND_TRIP_LEN + 1),
            Some(b'R' | b'l') => Some(RFC1123_LEN),
            _ => None,
        }
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        let mut out = Out::new(out);
        match format.symbol() {
            None | Some(b'G') => write_general(&mut out, self)?,
            Some(b'O') => {
                write_round_trip(&mut out, self)?;
                out.push(b'Z')?;
            }
            Some(symbol @ (b'R' | b'l')) => write_rfc1123(&mut out, self, symbol == b'l')?,
            _ => return None,
        }
        Some(out.len())
    }
}

impl sealed::Sealed for DateTimeOffset {}

impl Formattable for DateTimeOffset {
    fn max_len(format: Format) -> Option<usize> {
        match format.symbol() {
            None => Some(GENERAL_LEN + 1 + OFFSET_LEN),
            Some(b'G') => Some(GENERAL_LEN),
            Some(b'O') => Some(ROUND_TRIP_LEN + OFFSET_LEN),
            Some(b'R' | b'l') => Some(RFC1123_LEN),
            _ => None,
        }
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        let mut out = Out::new(out);
        match format.symbol() {
            None => {
                write_general(&mut out, self.local())?;
                out.push(b' ')?;
                write_offset(&mut out, self.offset_minutes())?;
            }
            Some(b'G') => write_general(&mut out, self.local())?,
            Some(b'O') => {
                write_round_trip(&mut out, self.local())?;
                write_offset(&mut out, self.offset_minutes())?;
            }
            Some(symbol @ (b'R' | b'l')) => {
                write_rfc1123(&mut out, self.utc(), symbol == b'l')?
            }
            _ => return None,
        }
        Some(out.len())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SpanLayout {
    /// `[-][d.]hh:mm:ss[.fffffff]`
    Constant,
    /// `[-]d:hh:mm:ss.fffffff`
    GeneralLong,
    /// `[-][d:]h:mm:ss[.FFFFFFF]`
    GeneralShort,
}

fn write_time_span(out: &mut Out, value: TimeSpan, layout: SpanLayout) -> Option<()> {
    if value.is_negative() {
        out.push(b'-')?;
    }
    let days = value.days();
    match layout {
        SpanLayout::Constant if days > 0 => {
            out.digits(days)?;
            out.push(b'.')?;
        }
        SpanLayout::GeneralShort if days > 0 => {
            out.digits(days)?;
            out.push(b':')?;
        }
        SpanLayout::GeneralLong => {
            out.digits(days)?;
            out.push(b':')?;
        }
        _ => {}
    }

    if layout == SpanLayout::GeneralShort {
        out.digits(value.hours())?;
    } else {
        out.two_digits(value.hours())?;
    }
    out.push(b':')?;
    out.two_digits(value.minutes())?;
    out.push(b':')?;
    out.two_digits(value.seconds())?;

    let fraction = value.fraction();
    match layout {
        SpanLayout::GeneralLong => {
            out.push(b'.')?;
            out.padded_digits(fraction.into(), 7)?;
        }
        SpanLayout::Constant if fraction > 0 => {
            out.push(b'.')?;
            out.padded_digits(fraction.into(), 7)?;
        }
        SpanLayout::GeneralShort if fraction > 0 => {
            let mut fraction = fraction;
            let mut width = 7;
            while fraction % 10 == 0 {
                fraction /= 10;
                width -= 1;
            }
            out.push(b'.')?;
            out.padded_digits(fraction.into(), width)?;
        }
        _ => {}
    }
    Some(())
}

impl sealed::Sealed for TimeSpan {}

impl Formattable for TimeSpan {
    fn max_len(format: Format) -> Option<usize> {
        match format.symbol() {
            None | Some(b'c' | b't' | b'T' | b'G' | b'g') => Some(TIME_SPAN_LEN),
            _ => None,
        }
    }

    fn format_into(self, out: &mut [u8], format: Format) -> Option<usize> {
        let layout = match format.symbol() {
            None | Some(b'c' | b't' | b'T') => SpanLayout::Constant,
            Some(b'G') => SpanLayout::GeneralLong,
            Some(b'g') => SpanLayout::GeneralShort,
            _ => return None,
        };
        let mut out = Out::new(out);
        write_time_span(&mut out, self, layout)?;
        Some(out.len())
    }
}
