//! Comment timestamp formatting (`MM/DD/YYYY HH:MM`, local time).

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

/// Calendar fields of a displayed timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeParts {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl TimeParts {
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{:02}/{:02}/{} {:02}:{:02}",
            self.month, self.day, self.year, self.hour, self.minute
        )
    }
}

/// Parse the leading `YYYY-MM-DD[T ]HH:MM` of a server timestamp as-is,
/// without any zone conversion.
#[must_use]
pub fn parse_naive(raw: &str) -> Option<TimeParts> {
    let raw = raw.trim();
    let field = |range: std::ops::Range<usize>| raw.get(range)?.parse::<u32>().ok();
    let sep = raw.as_bytes().get(10).copied()?;
    if raw.get(4..5) != Some("-") || raw.get(7..8) != Some("-") || !(sep == b'T' || sep == b' ') {
        return None;
    }
    if raw.get(13..14) != Some(":") {
        return None;
    }
    let parts = TimeParts {
        year: field(0..4)?,
        month: field(5..7)?,
        day: field(8..10)?,
        hour: field(11..13)?,
        minute: field(14..16)?,
    };
    let valid = (1..=12).contains(&parts.month)
        && (1..=31).contains(&parts.day)
        && parts.hour < 24
        && parts.minute < 60;
    valid.then_some(parts)
}

/// Format a comment's `lastedit` for display. A missing timestamp shows the
/// current time; an unparseable one is shown verbatim.
#[must_use]
pub fn format_comment_time(lastedit: Option<&str>) -> String {
    #[cfg(feature = "csr")]
    {
        let date = match lastedit {
            Some(raw) => js_sys::Date::new(&wasm_bindgen::JsValue::from_str(raw)),
            None => js_sys::Date::new_0(),
        };
        if date.get_time().is_nan() {
            return lastedit.unwrap_or_default().to_owned();
        }
        TimeParts {
            year: date.get_full_year(),
            month: date.get_month() + 1,
            day: date.get_date(),
            hour: date.get_hours(),
            minute: date.get_minutes(),
        }
        .display()
    }
    #[cfg(not(feature = "csr"))]
    {
        let raw = lastedit.unwrap_or_default();
        parse_naive(raw).map_or_else(|| raw.to_owned(), |parts| parts.display())
    }
}
