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

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use super::{
    ModelError, Position, Route, RouteData, Stop, StopData, TransferData, TransitData, Trip,
    TripData,
};
use crate::model::{FlowDirection, FootpathRecord, ServiceCalendar, TripRecord};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

impl TransitData {
    /// Builds the index from feed records.
    ///
    /// Records that cannot participate in routing (trips with less than two
    /// stop times, inconsistent times or an unknown service, footpaths
    /// touching unknown stops) are skipped with a warning. Identifier
    /// collisions are rejected, since the rest of the data cannot be keyed
    /// reliably against them.
    pub fn new(
        trips: Vec<TripRecord>,
        footpaths: Vec<FootpathRecord>,
        interchanges: HashMap<String, PositiveDuration>,
        calendars: Vec<ServiceCalendar>,
        default_interchange: PositiveDuration,
    ) -> Result<Self, ModelError> {
        let mut services: Vec<ServiceCalendar> = Vec::with_capacity(calendars.len());
        let mut service_id_to_idx: HashMap<String, usize> = HashMap::new();
        for calendar in calendars {
            match service_id_to_idx.entry(calendar.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(ModelError::DuplicateService(calendar.id));
                }
                Entry::Vacant(entry) => {
                    entry.insert(services.len());
                    services.push(calendar);
                }
            }
        }

        let mut builder = Builder {
            stops_data: Vec::new(),
            routes_data: Vec::new(),
            trips_data: Vec::new(),
            stop_id_to_stop: HashMap::new(),
            route_key_to_route: HashMap::new(),
            interchanges,
            default_interchange,
        };

        info!("Inserting {} trips", trips.len());
        let mut trip_ids: HashSet<String> = HashSet::new();
        for trip in trips {
            if !trip_ids.insert(trip.id.clone()) {
                return Err(ModelError::DuplicateTrip(trip.id));
            }
            let _ = builder.insert_trip(trip, &service_id_to_idx);
        }

        builder.sort_trips_within_routes();
        builder.fill_positions_in_routes();

        info!("Inserting {} footpaths", footpaths.len());
        builder.insert_footpaths(footpaths);

        for stop_id in builder.interchanges.keys() {
            if !builder.stop_id_to_stop.contains_key(stop_id) {
                warn!(
                    "The interchange duration of stop {} refers to a stop \
                     not served by any trip. I ignore it.",
                    stop_id
                );
            }
        }

        info!(
            "Timetable index built : {} stops, {} routes, {} trips",
            builder.stops_data.len(),
            builder.routes_data.len(),
            builder.trips_data.len()
        );

        Ok(Self {
            stops_data: builder.stops_data,
            routes_data: builder.routes_data,
            trips_data: builder.trips_data,
            services,
            stop_id_to_stop: builder.stop_id_to_stop,
        })
    }
}

struct Builder {
    stops_data: Vec<StopData>,
    routes_data: Vec<RouteData>,
    trips_data: Vec<TripData>,
    stop_id_to_stop: HashMap<String, Stop>,
    route_key_to_route: HashMap<Vec<(Stop, FlowDirection)>, Route>,
    interchanges: HashMap<String, PositiveDuration>,
    default_interchange: PositiveDuration,
}

impl Builder {
    fn insert_trip(
        &mut self,
        trip: TripRecord,
        service_id_to_idx: &HashMap<String, usize>,
    ) -> Result<(), ()> {
        if trip.stop_times.len() < 2 {
            warn!(
                "Skipping trip {} that has less than 2 stop times.",
                trip.id
            );
            return Err(());
        }

        let service = *service_id_to_idx.get(&trip.service_id).ok_or_else(|| {
            warn!(
                "Skipping trip {} because its service {} was not found.",
                trip.id, trip.service_id
            );
        })?;

        check_stop_times(&trip)?;

        let mut route_key = Vec::with_capacity(trip.stop_times.len());
        let mut board_times = Vec::with_capacity(trip.stop_times.len());
        let mut debark_times = Vec::with_capacity(trip.stop_times.len());
        for stop_time in &trip.stop_times {
            let stop = self.get_or_insert_stop(&stop_time.stop_id);
            route_key.push((stop, stop_time.flow));
            board_times.push(stop_time.departure);
            debark_times.push(stop_time.arrival);
        }

        let route = self.get_or_insert_route(route_key);
        let trip_idx = Trip {
            idx: self.trips_data.len(),
        };
        self.trips_data.push(TripData {
            id: trip.id,
            route,
            service,
            board_times,
            debark_times,
        });
        self.routes_data[route.idx].trips.push(trip_idx);

        Ok(())
    }

    fn get_or_insert_stop(&mut self, stop_id: &str) -> Stop {
        if let Some(stop) = self.stop_id_to_stop.get(stop_id) {
            return *stop;
        }
        let stop = Stop {
            idx: self.stops_data.len(),
        };
        let interchange = self
            .interchanges
            .get(stop_id)
            .copied()
            .unwrap_or(self.default_interchange);
        self.stops_data.push(StopData {
            id: stop_id.to_string(),
            interchange,
            transfers: Vec::new(),
            position_in_routes: Vec::new(),
        });
        self.stop_id_to_stop.insert(stop_id.to_string(), stop);
        stop
    }

    fn get_or_insert_route(&mut self, route_key: Vec<(Stop, FlowDirection)>) -> Route {
        if let Some(route) = self.route_key_to_route.get(&route_key) {
            return *route;
        }
        let route = Route {
            idx: self.routes_data.len(),
        };
        let path = route_key.iter().map(|(stop, _)| *stop).collect();
        let flows = route_key.iter().map(|(_, flow)| *flow).collect();
        self.routes_data.push(RouteData {
            path,
            flows,
            trips: Vec::new(),
        });
        self.route_key_to_route.insert(route_key, route);
        route
    }

    fn sort_trips_within_routes(&mut self) {
        let trips_data = &self.trips_data;
        for route_data in self.routes_data.iter_mut() {
            route_data.trips.sort_by(|lhs, rhs| {
                let lhs_data = &trips_data[lhs.idx];
                let rhs_data = &trips_data[rhs.idx];
                lhs_data.board_times[0]
                    .cmp(&rhs_data.board_times[0])
                    .then_with(|| lhs_data.id.cmp(&rhs_data.id))
            });
        }
    }

    fn fill_positions_in_routes(&mut self) {
        for (route_idx, route_data) in self.routes_data.iter().enumerate() {
            for (position_idx, stop) in route_data.path.iter().enumerate() {
                self.stops_data[stop.idx].position_in_routes.push((
                    Route { idx: route_idx },
                    Position { idx: position_idx },
                ));
            }
        }
    }

    // Keeps, per (from, to) pair, only footpaths that can improve a result :
    // the shortest unrestricted one, plus windowed ones strictly shorter
    // than it.
    fn insert_footpaths(&mut self, footpaths: Vec<FootpathRecord>) {
        type Window = Option<(SecondsSinceDayStart, SecondsSinceDayStart)>;
        let mut best: HashMap<(Stop, Stop, Window), PositiveDuration> = HashMap::new();

        for footpath in footpaths {
            let has_from = self.stop_id_to_stop.get(&footpath.from_stop_id);
            let has_to = self.stop_id_to_stop.get(&footpath.to_stop_id);
            let (from, to) = match (has_from, has_to) {
                (Some(from), Some(to)) => (*from, *to),
                _ => {
                    warn!(
                        "Skipping footpath between {} and {} because at least one \
                         of these stops is not served by any trip.",
                        footpath.from_stop_id, footpath.to_stop_id
                    );
                    continue;
                }
            };
            if from == to {
                warn!(
                    "Skipping footpath from {} to itself.",
                    footpath.from_stop_id
                );
                continue;
            }
            best.entry((from, to, footpath.window))
                .and_modify(|duration| *duration = (*duration).min(footpath.duration))
                .or_insert(footpath.duration);
        }

        let mut kept: Vec<(Stop, TransferData)> = Vec::with_capacity(best.len());
        for (&(from, to, window), &duration) in &best {
            if window.is_some() {
                // a windowed footpath is useful only when it beats the
                // unrestricted one
                let unrestricted = best.get(&(from, to, None));
                if unrestricted.map_or(false, |best_duration| *best_duration <= duration) {
                    continue;
                }
            }
            kept.push((
                from,
                TransferData {
                    to,
                    duration,
                    window,
                },
            ));
        }
        // deterministic order within each stop's transfer list
        kept.sort_by_key(|(from, data)| (*from, data.to, data.duration, data.window));
        for (from, data) in kept {
            self.stops_data[from.idx].transfers.push(data);
        }
    }
}

fn check_stop_times(trip: &TripRecord) -> Result<(), ()> {
    let mut previous_departure = None;
    for (idx, stop_time) in trip.stop_times.iter().enumerate() {
        if stop_time.departure < stop_time.arrival {
            warn!(
                "Skipping trip {} because its {}th stop time departs \
                 before it arrives.",
                trip.id, idx
            );
            return Err(());
        }
        if let Some(previous) = previous_departure {
            if stop_time.arrival < previous {
                warn!(
                    "Skipping trip {} because its {}th stop time arrives \
                     before the previous departure.",
                    trip.id, idx
                );
                return Err(());
            }
        }
        previous_departure = Some(stop_time.departure);
    }
    Ok(())
}
