//! "Last edited" label for thread headers.

use chrono::{DateTime, Utc};

/// Timestamps closer than this are treated as the same write.
const EDIT_THRESHOLD_MS: i64 = 1000;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Whether `updated_at` is far enough from `created_at` to count as an edit.
pub fn is_edited(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> bool {
    (updated_at - created_at).num_milliseconds().abs() >= EDIT_THRESHOLD_MS
}

/// Format the label against the current clock.
pub fn format_last_edited(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Option<String> {
    format_last_edited_at(created_at, updated_at, Utc::now())
}

/// Format the label relative to `now`.
///
/// Returns `None` for records that were never meaningfully edited. Units are
/// floored, so 90 seconds is "1 minute". Edits a week old or more fall back
/// to the absolute date of the edit.
pub fn format_last_edited_at(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<String> {
    if !is_edited(created_at, updated_at) {
        return None;
    }

    let diff_ms = (now - updated_at).num_milliseconds();
    let minutes = diff_ms.div_euclid(MINUTE_MS);
    let hours = diff_ms.div_euclid(HOUR_MS);
    let days = diff_ms.div_euclid(DAY_MS);

    let label = if minutes < 1 {
        "Edited just now".to_string()
    } else if minutes < 60 {
        format!("Edited {minutes} minute{} ago", plural(minutes))
    } else if hours < 24 {
        format!("Edited {hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("Edited {days} day{} ago", plural(days))
    } else {
        format!("Edited on {}", updated_at.format("%-m/%-d/%Y"))
    };
    Some(label)
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
