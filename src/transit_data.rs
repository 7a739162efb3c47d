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

//! The timetable index : trips grouped into routes, stop to routes
//! membership, pre-filtered footpaths, interchange durations and
//! calendar validity.
//!
//! Built once from feed records, then read-only for the lifetime of all
//! queries against it.

mod init;
mod iters;

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::{FlowDirection, ServiceCalendar};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

pub use iters::TransfersOfStop;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Stop {
    pub(crate) idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Route {
    pub(crate) idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Trip {
    pub(crate) idx: usize,
}

/// Rank of a stop along a route's path.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Position {
    pub(crate) idx: usize,
}

/// Handle on one outgoing footpath of a stop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Transfer {
    pub(crate) stop: Stop,
    pub(crate) idx_in_stop_transfers: usize,
}

impl Transfer {
    pub fn from_stop(&self) -> Stop {
        self.stop
    }
}

#[derive(Debug)]
pub(crate) struct TransferData {
    pub(crate) to: Stop,
    pub(crate) duration: PositiveDuration,
    pub(crate) window: Option<(SecondsSinceDayStart, SecondsSinceDayStart)>,
}

#[derive(Debug)]
pub(crate) struct StopData {
    pub(crate) id: String,
    pub(crate) interchange: PositiveDuration,
    pub(crate) transfers: Vec<TransferData>,
    pub(crate) position_in_routes: Vec<(Route, Position)>,
}

#[derive(Debug)]
pub(crate) struct RouteData {
    pub(crate) path: Vec<Stop>,
    pub(crate) flows: Vec<FlowDirection>,
    /// sorted by departure time at the first stop, then by trip id
    pub(crate) trips: Vec<Trip>,
}

#[derive(Debug)]
pub(crate) struct TripData {
    pub(crate) id: String,
    pub(crate) route: Route,
    pub(crate) service: usize,
    /// departure time per position
    pub(crate) board_times: Vec<SecondsSinceDayStart>,
    /// arrival time per position
    pub(crate) debark_times: Vec<SecondsSinceDayStart>,
}

#[derive(Debug)]
pub struct TransitData {
    pub(crate) stops_data: Vec<StopData>,
    pub(crate) routes_data: Vec<RouteData>,
    pub(crate) trips_data: Vec<TripData>,
    pub(crate) services: Vec<ServiceCalendar>,
    pub(crate) stop_id_to_stop: HashMap<String, Stop>,
}

impl TransitData {
    pub fn nb_of_stops(&self) -> usize {
        self.stops_data.len()
    }

    pub fn nb_of_routes(&self) -> usize {
        self.routes_data.len()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trips_data.len()
    }

    pub fn stop_by_id(&self, stop_id: &str) -> Option<Stop> {
        self.stop_id_to_stop.get(stop_id).copied()
    }

    pub fn stop_id(&self, stop: Stop) -> &str {
        &self.stops_data[stop.idx].id
    }

    pub fn trip_id(&self, trip: Trip) -> &str {
        &self.trips_data[trip.idx].id
    }

    pub fn stops(&self) -> impl Iterator<Item = Stop> {
        (0..self.stops_data.len()).map(|idx| Stop { idx })
    }

    /// Routes going through `stop`, with the position of `stop` on their path.
    /// A stop served twice by the same route appears once per position.
    pub fn routes_of(&self, stop: Stop) -> &[(Route, Position)] {
        &self.stops_data[stop.idx].position_in_routes
    }

    pub fn route_path(&self, route: Route) -> &[Stop] {
        &self.routes_data[route.idx].path
    }

    pub fn flow_at(&self, route: Route, position: Position) -> FlowDirection {
        self.routes_data[route.idx].flows[position.idx]
    }

    pub fn trips_of(&self, route: Route) -> &[Trip] {
        &self.routes_data[route.idx].trips
    }

    pub fn route_of(&self, trip: Trip) -> Route {
        self.trips_data[trip.idx].route
    }

    pub fn interchange(&self, stop: Stop) -> PositiveDuration {
        self.stops_data[stop.idx].interchange
    }

    pub fn transfers_of(&self, stop: Stop) -> TransfersOfStop {
        TransfersOfStop::new(stop, self.stops_data[stop.idx].transfers.len())
    }

    /// Destination and walking duration of a footpath.
    pub fn transfer(&self, transfer: Transfer) -> (Stop, PositiveDuration) {
        let data = &self.stops_data[transfer.stop.idx].transfers[transfer.idx_in_stop_transfers];
        (data.to, data.duration)
    }

    pub fn transfer_window(
        &self,
        transfer: Transfer,
    ) -> Option<(SecondsSinceDayStart, SecondsSinceDayStart)> {
        self.stops_data[transfer.stop.idx].transfers[transfer.idx_in_stop_transfers].window
    }

    pub fn arrival_time_of(&self, trip: Trip, position: Position) -> SecondsSinceDayStart {
        self.trips_data[trip.idx].debark_times[position.idx]
    }

    pub fn departure_time_of(&self, trip: Trip, position: Position) -> SecondsSinceDayStart {
        self.trips_data[trip.idx].board_times[position.idx]
    }

    pub fn is_trip_active(&self, trip: Trip, date: NaiveDate, day_of_week: Weekday) -> bool {
        let service = &self.services[self.trips_data[trip.idx].service];
        service.is_active_on(date, day_of_week)
    }

    /// Earliest trip of `route` boardable at `position` departing no earlier
    /// than `waiting_time`, among trips whose service is active on `date`.
    /// Trips are examined in route order (departure at first stop, then trip
    /// id), which makes the same-instant tie-break deterministic.
    pub fn best_trip_to_board(
        &self,
        route: Route,
        position: Position,
        waiting_time: SecondsSinceDayStart,
        date: NaiveDate,
        day_of_week: Weekday,
    ) -> Option<Trip> {
        if !self.flow_at(route, position).allows_board() {
            return None;
        }
        self.routes_data[route.idx]
            .trips
            .iter()
            .copied()
            .find(|&trip| {
                self.departure_time_of(trip, position) >= waiting_time
                    && self.is_trip_active(trip, date, day_of_week)
            })
    }

    /// Ascending, deduplicated departure times of `stop` on `date`, over
    /// boarding-permitted stop times of services active that day.
    pub fn departure_times_at(&self, stop: Stop, date: NaiveDate) -> Vec<SecondsSinceDayStart> {
        let day_of_week = date.weekday();
        let mut times = Vec::new();
        for &(route, position) in self.routes_of(stop) {
            if !self.flow_at(route, position).allows_board() {
                continue;
            }
            // boarding at the end of a path leads nowhere
            if position.idx + 1 == self.route_path(route).len() {
                continue;
            }
            for &trip in self.trips_of(route) {
                if self.is_trip_active(trip, date, day_of_week) {
                    times.push(self.departure_time_of(trip, position));
                }
            }
        }
        times.sort_unstable();
        times.dedup();
        times
    }
}

/// Structurally invalid input that cannot be repaired by skipping
/// a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    DuplicateService(String),
    DuplicateTrip(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::DuplicateService(id) => {
                write!(f, "The service {} is defined twice.", id)
            }
            ModelError::DuplicateTrip(id) => {
                write!(f, "The trip {} is defined twice.", id)
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// A query referencing identifiers unknown to the timetable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadRequest {
    UnknownStop(String),
}

impl fmt::Display for BadRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BadRequest::UnknownStop(id) => {
                write!(f, "The stop {} does not appear in the timetable.", id)
            }
        }
    }
}

impl std::error::Error for BadRequest {}
