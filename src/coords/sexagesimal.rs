use std::fmt;

use crate::coords::CoordError;

// Seconds this close to 60 after a decimal split are rounding noise and carry
// into the next minute.
const CARRY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn apply(self, value: f64) -> f64 {
        match self {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Sign::Positive => "",
            Sign::Negative => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    /// Right ascension, 15 degrees per hour.
    Hours,
    Degrees,
}

impl AngleUnit {
    fn degrees_per_unit(self) -> f64 {
        match self {
            AngleUnit::Hours => 15.0,
            AngleUnit::Degrees => 1.0,
        }
    }

    fn suffix(self) -> char {
        match self {
            AngleUnit::Hours => 'h',
            AngleUnit::Degrees => 'd',
        }
    }
}

/// A sexagesimal angle in signed-magnitude form.
///
/// The whole/minutes/seconds fields are never negative; the sign lives only in
/// [`Sign`], so `-00:30:00` keeps its sign even though the whole part is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sexagesimal {
    pub sign: Sign,
    pub whole: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Sexagesimal {
    pub fn new(sign: Sign, whole: u32, minutes: u32, seconds: f64) -> Self {
        Self {
            sign,
            whole,
            minutes,
            seconds,
        }
    }

    /// Magnitude in the angle's own unit (hours or degrees).
    fn magnitude(&self) -> f64 {
        self.whole as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }

    /// Convert to decimal degrees. Hours are scaled by 15.
    pub fn to_degrees(&self, unit: AngleUnit) -> f64 {
        self.sign.apply(self.magnitude() * unit.degrees_per_unit())
    }

    /// Split decimal degrees into sexagesimal fields of the given unit.
    pub fn from_degrees(value: f64, unit: AngleUnit) -> Self {
        let sign = if value.is_sign_negative() {
            Sign::Negative
        } else {
            Sign::Positive
        };
        Self::from_magnitude(sign, value.abs() / unit.degrees_per_unit())
    }

    fn from_magnitude(sign: Sign, magnitude: f64) -> Self {
        let mut whole = magnitude.floor();
        let rest = (magnitude - whole) * 60.0;
        let mut minutes = rest.floor();
        let mut seconds = (rest - minutes) * 60.0;

        if 60.0 - seconds < CARRY_EPSILON {
            seconds = 0.0;
            minutes += 1.0;
        }
        if minutes >= 60.0 {
            minutes -= 60.0;
            whole += 1.0;
        }

        Self {
            sign,
            whole: whole as u32,
            minutes: minutes as u32,
            seconds,
        }
    }

    /// Parse a sexagesimal string such as `12:30:45.5`, `12 30 45.5`,
    /// `12h30m45.5s` or `-00d30m00s`. One to three fields are accepted;
    /// missing trailing fields are zero and a lone field may be fractional.
    pub fn parse(text: &str, unit: AngleUnit) -> Result<Self, CoordError> {
        let (sign, body) = split_sign(text.trim());
        if sign == Sign::Negative && unit == AngleUnit::Hours {
            return Err(CoordError::NegativeHours(text.to_string()));
        }

        let fields: Vec<&str> = body
            .split(is_separator)
            .filter(|f| !f.is_empty())
            .collect();

        match fields.as_slice() {
            [single] => {
                let magnitude = parse_seconds(single, text)?;
                Ok(Self::from_magnitude(sign, magnitude))
            }
            [whole, minutes] => Ok(Self {
                sign,
                whole: parse_field(whole, text)?,
                minutes: parse_field(minutes, text)?,
                seconds: 0.0,
            }),
            [whole, minutes, seconds] => Ok(Self {
                sign,
                whole: parse_field(whole, text)?,
                minutes: parse_field(minutes, text)?,
                seconds: parse_seconds(seconds, text)?,
            }),
            _ => Err(CoordError::WrongFieldCount(text.to_string())),
        }
    }

    /// Build from three separate tokens, as they appear in delimited records.
    /// The sign is read from the text of the leading token.
    pub fn from_fields(
        whole: &str,
        minutes: &str,
        seconds: &str,
        unit: AngleUnit,
    ) -> Result<Self, CoordError> {
        let (sign, whole_digits) = split_sign(whole.trim());
        if sign == Sign::Negative && unit == AngleUnit::Hours {
            return Err(CoordError::NegativeHours(whole.to_string()));
        }

        Ok(Self {
            sign,
            whole: parse_field(whole_digits, whole)?,
            minutes: parse_field(minutes.trim(), minutes)?,
            seconds: parse_seconds(seconds.trim(), seconds)?,
        })
    }

    /// Format as `12h30m45.50s` or `-00d30m00.00s`, seconds rounded to
    /// hundredths with carry.
    pub fn format(&self, unit: AngleUnit) -> String {
        let centis = (self.magnitude() * 360_000.0).round() as u64;
        let whole = centis / 360_000;
        let minutes = (centis / 6_000) % 60;
        let seconds = centis % 6_000;
        format!(
            "{sign}{whole:02}{unit}{minutes:02}m{secs:02}.{frac:02}s",
            sign = self.sign.prefix(),
            unit = unit.suffix(),
            secs = seconds / 100,
            frac = seconds % 100,
        )
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}:{:02}:{:05.2}",
            self.sign.prefix(),
            self.whole,
            self.minutes,
            self.seconds
        )
    }
}

fn is_separator(c: char) -> bool {
    c == ':'
        || c.is_whitespace()
        || matches!(c, 'h' | 'd' | 'm' | 's' | 'H' | 'D' | 'M' | 'S' | '°' | '\'' | '"')
}

fn split_sign(text: &str) -> (Sign, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (Sign::Negative, rest)
    } else {
        (Sign::Positive, text.strip_prefix('+').unwrap_or(text))
    }
}

fn parse_field(token: &str, original: &str) -> Result<u32, CoordError> {
    token
        .parse()
        .map_err(|_| CoordError::InvalidCoordinateFormat(original.to_string()))
}

fn parse_seconds(token: &str, original: &str) -> Result<f64, CoordError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(CoordError::InvalidCoordinateFormat(original.to_string())),
    }
}
