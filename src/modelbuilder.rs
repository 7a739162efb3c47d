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

//! Builder used to easily create a [`TransitData`] in tests and demos.
//! Time and date arguments are strings, panicking on bad input.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};

use crate::config::RequestParams;
use crate::model::{
    FlowDirection, FootpathRecord, ServiceCalendar, StopTimeRecord, TripRecord,
};
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::{ModelError, TransitData};

/// Builder used to easily create a `TransitData`
///
/// ```
/// # use hermod::modelbuilder::TimetableBuilder;
/// let data = TimetableBuilder::new()
///     .calendar("service1", &["2020-01-01"])
///     .trip("toto", "service1", |t| {
///         t.st("A", "10:00:00", "10:00:30")
///             .st("B", "11:00:00", "11:00:30");
///     })
///     .footpath("A", "B", "00:10:00")
///     .build()
///     .unwrap();
/// assert_eq!(data.nb_of_stops(), 2);
/// ```
#[derive(Default)]
pub struct TimetableBuilder {
    trips: Vec<TripRecord>,
    footpaths: Vec<FootpathRecord>,
    interchanges: HashMap<String, PositiveDuration>,
    calendars: Vec<ServiceCalendar>,
}

pub struct TripBuilder<'a> {
    trip: &'a mut TripRecord,
}

impl TimetableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service active exactly on the given dates.
    pub fn calendar(mut self, id: &str, dates: &[&str]) -> Self {
        let parsed: Vec<NaiveDate> = dates
            .iter()
            .map(|date| NaiveDate::from_str(date).expect("badly formed date"))
            .collect();
        let fallback = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let start_date = parsed.iter().min().copied().unwrap_or(fallback);
        let end_date = parsed.iter().max().copied().unwrap_or(fallback);
        self.calendars.push(ServiceCalendar {
            id: id.to_string(),
            start_date,
            end_date,
            weekdays: [false; 7],
            include: parsed.into_iter().collect(),
            exclude: HashSet::new(),
        });
        self
    }

    /// A service active on the given weekdays between two dates.
    pub fn weekly_calendar(
        mut self,
        id: &str,
        start_date: &str,
        end_date: &str,
        weekdays: &[Weekday],
    ) -> Self {
        let mut flags = [false; 7];
        for day in weekdays {
            flags[day.num_days_from_monday() as usize] = true;
        }
        self.calendars.push(ServiceCalendar {
            id: id.to_string(),
            start_date: NaiveDate::from_str(start_date).expect("badly formed date"),
            end_date: NaiveDate::from_str(end_date).expect("badly formed date"),
            weekdays: flags,
            include: HashSet::new(),
            exclude: HashSet::new(),
        });
        self
    }

    pub fn exclude(mut self, service_id: &str, date: &str) -> Self {
        let date = NaiveDate::from_str(date).expect("badly formed date");
        self.service_mut(service_id).exclude.insert(date);
        self
    }

    pub fn include(mut self, service_id: &str, date: &str) -> Self {
        let date = NaiveDate::from_str(date).expect("badly formed date");
        self.service_mut(service_id).include.insert(date);
        self
    }

    /// Add a new trip, its stop times filled by the closure.
    pub fn trip<F>(mut self, id: &str, service_id: &str, mut trip_initer: F) -> Self
    where
        F: FnMut(TripBuilder),
    {
        self.trips.push(TripRecord {
            id: id.to_string(),
            service_id: service_id.to_string(),
            stop_times: Vec::new(),
        });
        let trip = self.trips.last_mut().unwrap();
        trip_initer(TripBuilder { trip });
        self
    }

    pub fn footpath(mut self, from: &str, to: &str, duration: &str) -> Self {
        self.footpaths.push(FootpathRecord {
            from_stop_id: from.to_string(),
            to_stop_id: to.to_string(),
            duration: PositiveDuration::from_str(duration).expect("badly formed duration"),
            window: None,
        });
        self
    }

    pub fn footpath_windowed(
        mut self,
        from: &str,
        to: &str,
        duration: &str,
        window_start: &str,
        window_end: &str,
    ) -> Self {
        self.footpaths.push(FootpathRecord {
            from_stop_id: from.to_string(),
            to_stop_id: to.to_string(),
            duration: PositiveDuration::from_str(duration).expect("badly formed duration"),
            window: Some((
                SecondsSinceDayStart::from_str(window_start).expect("badly formed time"),
                SecondsSinceDayStart::from_str(window_end).expect("badly formed time"),
            )),
        });
        self
    }

    pub fn interchange(mut self, stop_id: &str, duration: &str) -> Self {
        self.interchanges.insert(
            stop_id.to_string(),
            PositiveDuration::from_str(duration).expect("badly formed duration"),
        );
        self
    }

    pub fn build(self) -> Result<TransitData, ModelError> {
        self.build_with_params(&RequestParams::default())
    }

    /// Builds with explicit request parameters : stops without an
    /// explicit interchange duration get `default_interchange_duration`.
    pub fn build_with_params(self, params: &RequestParams) -> Result<TransitData, ModelError> {
        TransitData::new(
            self.trips,
            self.footpaths,
            self.interchanges,
            self.calendars,
            params.default_interchange_duration,
        )
    }

    fn service_mut(&mut self, service_id: &str) -> &mut ServiceCalendar {
        self.calendars
            .iter_mut()
            .find(|calendar| calendar.id == service_id)
            .expect("unknown service")
    }
}

impl<'a> TripBuilder<'a> {
    /// Add a stop time allowing both boarding and alighting.
    pub fn st(self, stop_id: &str, arrival: &str, departure: &str) -> Self {
        self.st_flow(stop_id, arrival, departure, FlowDirection::BoardAndDebark)
    }

    pub fn st_flow(
        self,
        stop_id: &str,
        arrival: &str,
        departure: &str,
        flow: FlowDirection,
    ) -> Self {
        self.trip.stop_times.push(StopTimeRecord {
            stop_id: stop_id.to_string(),
            arrival: SecondsSinceDayStart::from_str(arrival).expect("badly formed time"),
            departure: SecondsSinceDayStart::from_str(departure).expect("badly formed time"),
            flow,
        });
        self
    }
}
