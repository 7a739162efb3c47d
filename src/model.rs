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

//! Record types delivered by the feed ingestion collaborator.
//!
//! These are plain data, keyed by the stop and service identifiers of the
//! upstream feed. [`crate::TransitData`] interns them into dense indices
//! at construction time.

use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};

use crate::time::{PositiveDuration, SecondsSinceDayStart};

/// Boarding/alighting permissions of one stop time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum FlowDirection {
    BoardOnly,
    DebarkOnly,
    BoardAndDebark,
    NoBoardDebark,
}

impl FlowDirection {
    pub fn allows_board(&self) -> bool {
        matches!(self, FlowDirection::BoardOnly | FlowDirection::BoardAndDebark)
    }

    pub fn allows_debark(&self) -> bool {
        matches!(
            self,
            FlowDirection::DebarkOnly | FlowDirection::BoardAndDebark
        )
    }
}

#[derive(Debug, Clone)]
pub struct StopTimeRecord {
    pub stop_id: String,
    pub arrival: SecondsSinceDayStart,
    pub departure: SecondsSinceDayStart,
    pub flow: FlowDirection,
}

/// One service instance : an ordered sequence of stop times, valid on the
/// dates determined by its service calendar.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub id: String,
    pub service_id: String,
    pub stop_times: Vec<StopTimeRecord>,
}

/// A directed walking edge between two stops, with an optional validity
/// window on the instant the walk starts.
#[derive(Debug, Clone)]
pub struct FootpathRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub duration: PositiveDuration,
    pub window: Option<(SecondsSinceDayStart, SecondsSinceDayStart)>,
}

/// Weekly validity pattern of a service, with explicit exception dates.
#[derive(Debug, Clone)]
pub struct ServiceCalendar {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// indexed by `Weekday::num_days_from_monday()`
    pub weekdays: [bool; 7],
    pub include: HashSet<NaiveDate>,
    pub exclude: HashSet<NaiveDate>,
}

impl ServiceCalendar {
    /// The calendar validity predicate : the weekly flag is set for `date`'s
    /// range and the date is not excluded, or the date is explicitly included.
    pub fn is_active_on(&self, date: NaiveDate, day_of_week: Weekday) -> bool {
        if self.include.contains(&date) {
            return true;
        }
        self.weekdays[day_of_week.num_days_from_monday() as usize]
            && self.start_date <= date
            && date <= self.end_date
            && !self.exclude.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn weekdays_only() -> ServiceCalendar {
        ServiceCalendar {
            id: "weekdays".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            weekdays: [true, true, true, true, true, false, false],
            include: HashSet::new(),
            exclude: HashSet::new(),
        }
    }

    #[test]
    fn weekly_flags() {
        let calendar = weekdays_only();
        // 2020-01-06 is a Monday
        let monday = NaiveDate::from_str("2020-01-06").unwrap();
        let saturday = NaiveDate::from_str("2020-01-11").unwrap();
        assert!(calendar.is_active_on(monday, Weekday::Mon));
        assert!(!calendar.is_active_on(saturday, Weekday::Sat));
    }

    #[test]
    fn exceptions_override_weekly_flags() {
        let mut calendar = weekdays_only();
        let monday = NaiveDate::from_str("2020-01-06").unwrap();
        let saturday = NaiveDate::from_str("2020-01-11").unwrap();
        calendar.exclude.insert(monday);
        calendar.include.insert(saturday);
        assert!(!calendar.is_active_on(monday, Weekday::Mon));
        assert!(calendar.is_active_on(saturday, Weekday::Sat));
    }

    #[test]
    fn out_of_range_dates_are_inactive() {
        let calendar = weekdays_only();
        // a Monday of the following year
        let monday = NaiveDate::from_str("2021-01-04").unwrap();
        assert!(!calendar.is_active_on(monday, Weekday::Mon));
    }
}
