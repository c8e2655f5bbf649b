use chrono::{NaiveDateTime, Utc};

/// Wall-clock instant used for the quiz availability window.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}
