// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::const_assert;

/// An instant of the service day, as found in timetable stop times.
/// Values up to 48:00:00 are allowed, so that trips running over
/// midnight keep increasing times along their stop sequence.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceDayStart {
    seconds: u32,
}

const MAX_SECONDS_SINCE_DAY_START: u32 = 48 * 60 * 60; // 48h

// the "unreached" sentinel must keep headroom for an interchange
// plus a footpath duration without wrapping
const_assert!(MAX_SECONDS_SINCE_DAY_START < u32::MAX / 4);

/// A non-negative amount of time (walking durations, interchange buffers).
#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash)]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl SecondsSinceDayStart {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    /// The sentinel standing for "unreached" in arrival tables.
    /// It is absorbing : adding a duration to it yields it back.
    pub fn max() -> Self {
        Self { seconds: u32::MAX }
    }

    pub fn is_max(&self) -> bool {
        self.seconds == u32::MAX
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds > MAX_SECONDS_SINCE_DAY_START {
            None
        } else {
            Some(Self { seconds })
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.seconds as u64
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_max() {
            return write!(f, "unreached");
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    text: String,
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse '{}' as a time. Expected the format HH:MM:SS.",
            self.text
        )
    }
}

impl std::error::Error for TimeParseError {}

fn parse_hms(text: &str) -> Result<u32, TimeParseError> {
    let mk_err = || TimeParseError {
        text: text.to_string(),
    };
    let mut parts = text.split(':');
    let hours: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(mk_err)?;
    let minutes: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(mk_err)?;
    let seconds: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(mk_err)?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return Err(mk_err());
    }
    Ok(seconds + 60 * minutes + 60 * 60 * hours)
}

impl FromStr for SecondsSinceDayStart {
    type Err = TimeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let seconds = parse_hms(text)?;
        SecondsSinceDayStart::from_seconds(seconds).ok_or_else(|| TimeParseError {
            text: text.to_string(),
        })
    }
}

impl FromStr for PositiveDuration {
    type Err = TimeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let seconds = parse_hms(text)?;
        Ok(PositiveDuration { seconds })
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds),
        }
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceDayStart {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        // keeps the "unreached" sentinel absorbing
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds),
        }
    }
}

impl Serialize for PositiveDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hours = self.seconds / (60 * 60);
        let minutes = self.seconds / 60 % 60;
        let seconds = self.seconds % 60;
        serializer.serialize_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds))
    }
}

impl<'de> Deserialize<'de> for PositiveDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        PositiveDuration::from_str(&text).map_err(serde::de::Error::custom)
    }
}
