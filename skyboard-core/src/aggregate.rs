//! Roll a 3-hour forecast list into short-term cards and per-day summaries.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::{
    local_time::{date_key, format_clock, local_instant, weekday_label},
    model::{DaySummary, ForecastView, HourlyEntry, TimezoneOffset, WeatherSample},
};

/// Number of samples shown as short-term cards.
pub const SHORT_TERM_LEN: usize = 5;

/// Maximum number of calendar days summarized.
pub const DAILY_LEN: usize = 5;

/// Build both forecast views from chronologically ordered samples.
///
/// Samples whose local instant cannot be represented are skipped.
pub fn aggregate(samples: &[WeatherSample], offset: TimezoneOffset) -> ForecastView {
    let mut short_term = Vec::with_capacity(SHORT_TERM_LEN.min(samples.len()));
    let mut daily: Vec<DaySummary> = Vec::new();
    let mut index_by_day: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(local) = local_instant(sample.timestamp_utc, offset) else {
            tracing::warn!(
                timestamp = sample.timestamp_utc,
                offset = offset.seconds(),
                "skipping forecast sample with unrepresentable local time"
            );
            continue;
        };

        if short_term.len() < SHORT_TERM_LEN {
            short_term.push(HourlyEntry {
                sample: sample.clone(),
                local_time: format_clock(&local),
            });
        }

        let key = date_key(&local);
        let temp = round_temperature(sample.temperature_c);

        match index_by_day.get(&key) {
            Some(&idx) => {
                let day = &mut daily[idx];
                day.min_temperature_c = day.min_temperature_c.min(temp);
                day.max_temperature_c = day.max_temperature_c.max(temp);
            }
            None => {
                index_by_day.insert(key, daily.len());
                daily.push(DaySummary {
                    date_key: key,
                    weekday_label: weekday_label(&local).to_string(),
                    min_temperature_c: temp,
                    max_temperature_c: temp,
                    icon_code: sample.icon_code.clone(),
                    description: sample.description.clone(),
                });
            }
        }
    }

    daily.truncate(DAILY_LEN);

    ForecastView { short_term, daily }
}

/// Round to the nearest whole degree, halves toward positive infinity.
pub fn round_temperature(celsius: f64) -> i32 {
    if celsius - celsius.floor() == 0.5 {
        celsius.ceil() as i32
    } else {
        celsius.round() as i32
    }
}
