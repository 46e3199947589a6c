// Lap time parsing and display formatting for backend duration strings

/// Sentinel returned for durations that are missing or cannot be parsed, so they
/// sort after every recorded time in ascending order.
pub const MISSING_LAP_TIME: f64 = f64::INFINITY;

/// Parse a backend duration (e.g. `"0 days 00:01:17.329000"`) into seconds.
///
/// Returns [`MISSING_LAP_TIME`] for absent, empty or unrecognised values. Malformed
/// hour, minute or second fields contribute zero instead of failing the parse.
pub fn parse_lap_time_seconds(value: Option<&str>) -> f64 {
    value
        .and_then(clock_seconds)
        .unwrap_or(MISSING_LAP_TIME)
}

/// Format a backend duration for display as `M:SS.mmm` (e.g. `"1:17.329"`).
///
/// Returns `None` for absent or blank input. Values that do not look like a
/// duration are returned trimmed and otherwise unchanged.
pub fn format_lap_time(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match clock_seconds(trimmed) {
        Some(total) => {
            let minutes = (total / 60.0).floor();
            let seconds = fixed_millis(total % 60.0);
            Some(format!("{minutes}:{seconds}"))
        }
        None => Some(trimmed.to_string()),
    }
}

/// Format a duration for a table cell, using `-` when there is nothing to show.
pub fn lap_time_cell(value: Option<&str>) -> String {
    format_lap_time(value).unwrap_or_else(|| "-".to_string())
}

/// `value` with three decimals, rounding exact halves up.
///
/// `{:.3}` already rounds to the nearest representable result, but sends exact
/// ties to the even digit. A non-negative double sits exactly halfway between
/// two millisecond values only when it is an odd multiple of 1/16.
fn fixed_millis(value: f64) -> String {
    let sixteenths = value * 16.0;
    if sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        format!("{:.3}", (value * 1000.0).round() / 1000.0)
    } else {
        format!("{value:.3}")
    }
}

/// Total seconds of a recognised duration string, `None` when the text is not
/// a duration.
fn clock_seconds(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !looks_like_duration(trimmed) {
        return None;
    }

    let clock = strip_zero_days(trimmed).trim();
    let mut fields = clock.split(':');
    let (Some(hours), Some(minutes), Some(seconds)) = (fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    let hours = leading_integer(hours).unwrap_or(0.0);
    let minutes = leading_integer(minutes).unwrap_or(0.0);
    let seconds = leading_decimal(seconds).unwrap_or(0.0);
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn looks_like_duration(value: &str) -> bool {
    value.contains("days") || (value.contains(':') && value.contains('.'))
}

/// Remove a leading `"0 days "` prefix. Other day counts are left in place.
fn strip_zero_days(value: &str) -> &str {
    let Some(after_zero) = value.trim_start().strip_prefix('0') else {
        return value;
    };
    let before_days = after_zero.trim_start();
    if before_days.len() == after_zero.len() {
        return value;
    }
    let Some(after_days) = before_days.strip_prefix("days") else {
        return value;
    };
    let clock = after_days.trim_start();
    if clock.len() == after_days.len() {
        return value;
    }
    clock
}

/// Integer at the start of `field`, ignoring anything after it (`"1 days 00"` is 1).
fn leading_integer(field: &str) -> Option<f64> {
    let field = field.trim_start();
    let bytes = field.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    field[..end].parse::<f64>().ok()
}

/// Decimal number at the start of `field`, including an optional fraction and exponent.
fn leading_decimal(field: &str) -> Option<f64> {
    let field = field.trim_start();
    let bytes = field.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut fraction_end = end + 1;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
            digits += 1;
        }
        end = fraction_end;
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if exponent_end < bytes.len() && matches!(bytes[exponent_end], b'+' | b'-') {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }
    field[..end].parse::<f64>().ok()
}
