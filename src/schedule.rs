use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::America::Los_Angeles;
use chrono_tz::Tz;

use crate::data::types::TargetDay;

/// Every "today vs tomorrow" decision and the hourly table below run off this
/// one zone, regardless of where the process is hosted.
pub const REFERENCE_ZONE: Tz = Los_Angeles;

pub fn reference_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&REFERENCE_ZONE)
}

/// Settlement-date token embedded in contract tickers: two-digit year,
/// three-letter month, two-digit day, upper-cased ("24MAR05").
pub fn date_token(reference_date: NaiveDate, day: TargetDay) -> String {
    let date = match day {
        TargetDay::Today => reference_date,
        TargetDay::Tomorrow => reference_date + Days::new(1),
    };
    date.format("%y%b%d").to_string().to_uppercase()
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionTask {
    pub city: &'static str,
    pub day: TargetDay,
}

const fn today(city: &'static str) -> CollectionTask {
    CollectionTask { city, day: TargetDay::Today }
}

const fn tomorrow(city: &'static str) -> CollectionTask {
    CollectionTask { city, day: TargetDay::Tomorrow }
}

// Hand-derived from each city's market rollover, expressed in the reference
// zone. A city's "tomorrow" window opens when its local market has already
// rolled to the next settlement day; its "today" window closes at its local
// early-afternoon settlement:
//   la          midnight / 4 pm local  -> hours 0-16, never tomorrow
//   den         11 pm previous / 3 pm  -> hour 23 tomorrow, 0-15 today
//   chi, aus    10 pm previous / 2 pm  -> hours 22-23 tomorrow, 0-14 today
//   ny, mia, phil  9 pm previous / 1 pm -> hours 20-23 tomorrow, 0-13 today
static ALL_CITIES_TODAY: [CollectionTask; 7] = [
    today("ny"),
    today("mia"),
    today("phil"),
    today("chi"),
    today("aus"),
    today("den"),
    today("la"),
];

static EASTERN_TOMORROW: [CollectionTask; 3] =
    [tomorrow("ny"), tomorrow("mia"), tomorrow("phil")];

static CENTRAL_TOMORROW: [CollectionTask; 5] = [
    tomorrow("ny"),
    tomorrow("mia"),
    tomorrow("phil"),
    tomorrow("chi"),
    tomorrow("aus"),
];

static MOUNTAIN_TOMORROW: [CollectionTask; 6] = [
    tomorrow("ny"),
    tomorrow("mia"),
    tomorrow("phil"),
    tomorrow("chi"),
    tomorrow("aus"),
    tomorrow("den"),
];

static AFTERNOON_CENTRAL: [CollectionTask; 4] =
    [today("chi"), today("aus"), today("den"), today("la")];

static AFTERNOON_MOUNTAIN: [CollectionTask; 2] = [today("den"), today("la")];

static AFTERNOON_PACIFIC: [CollectionTask; 1] = [today("la")];

/// Collection tasks due at a reference-zone hour. Hours with nothing due
/// (17-19) return an empty slice; that is a normal outcome.
pub fn tasks_for_hour(hour: u32) -> &'static [CollectionTask] {
    match hour {
        0..=13 => &ALL_CITIES_TODAY,
        14 => &AFTERNOON_CENTRAL,
        15 => &AFTERNOON_MOUNTAIN,
        16 => &AFTERNOON_PACIFIC,
        20 | 21 => &EASTERN_TOMORROW,
        22 => &CENTRAL_TOMORROW,
        23 => &MOUNTAIN_TOMORROW,
        _ => &[],
    }
}
