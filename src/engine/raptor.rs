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

//! The round-based reachability scan. Round k holds the earliest
//! arrival at each stop using at most k trip boardings.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use tracing::debug;

use crate::config::RequestParams;
use crate::engine::connections::{Connection, ConnectionIndex, RoundArrivals};
use crate::time::SecondsSinceDayStart;
use crate::transit_data::{Position, Route, Stop, TransitData, Trip};

/// Best-known arrival time per stop, supplied by the caller as an upper
/// bound. `SecondsSinceDayStart::max()` stands for "unknown".
///
/// Bounds only prune work : a stop whose new arrival does not beat its
/// bound is not propagated further, but the arrival itself (and its
/// connection) is still recorded, so a bound tighter than what is
/// actually achievable never corrupts the scan's own results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalBounds {
    bounds: Vec<SecondsSinceDayStart>,
}

impl ArrivalBounds {
    pub fn unknown(nb_of_stops: usize) -> Self {
        Self {
            bounds: vec![SecondsSinceDayStart::max(); nb_of_stops],
        }
    }

    pub fn set(&mut self, stop: Stop, time: SecondsSinceDayStart) {
        self.bounds[stop.idx] = time;
    }

    pub fn get(&self, stop: Stop) -> SecondsSinceDayStart {
        self.bounds[stop.idx]
    }

    pub fn nb_of_stops(&self) -> usize {
        self.bounds.len()
    }

    /// Per-stop minimum with an arrival table of a previous scan.
    pub fn merge_round(&mut self, round_table: &[SecondsSinceDayStart]) {
        debug_assert_eq!(self.bounds.len(), round_table.len());
        for (bound, arrival) in self.bounds.iter_mut().zip(round_table.iter()) {
            if *arrival < *bound {
                *bound = *arrival;
            }
        }
    }
}

/// Everything one scan produced : the per-round arrival tables and the
/// backpointers recording how each arrival was achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResults {
    pub k_arrivals: RoundArrivals,
    pub k_connections: ConnectionIndex,
    origin: Stop,
    departure_time: SecondsSinceDayStart,
}

impl ScanResults {
    pub fn origin(&self) -> Stop {
        self.origin
    }

    pub fn departure_time(&self) -> SecondsSinceDayStart {
        self.departure_time
    }
}

pub struct RaptorScanner<'data> {
    data: &'data TransitData,
    max_rounds: usize,
}

impl<'data> RaptorScanner<'data> {
    pub fn new(data: &'data TransitData, params: &RequestParams) -> Self {
        Self {
            data,
            max_rounds: usize::from(params.max_nb_of_rounds).max(1),
        }
    }

    /// Computes, for every stop and every round k, the earliest arrival
    /// achievable from `origin` leaving at `departure_time` with at most
    /// k trip boardings, together with the connection that achieved it.
    ///
    /// A pure function of its inputs and the timetable index : scanning
    /// twice with identical inputs yields identical results.
    pub fn scan(
        &self,
        bounds: &ArrivalBounds,
        origin: Stop,
        date: NaiveDate,
        day_of_week: Weekday,
        departure_time: SecondsSinceDayStart,
    ) -> ScanResults {
        let nb_of_stops = self.data.nb_of_stops();
        debug_assert_eq!(bounds.nb_of_stops(), nb_of_stops);

        let mut round_zero = bounds.bounds.clone();
        round_zero[origin.idx] = departure_time;
        let mut arrivals = RoundArrivals::with_round_zero(round_zero);
        let mut connections = ConnectionIndex::new(nb_of_stops, self.max_rounds);

        // the bounds seeded into `arrivals` round 0 are carried as a
        // starting bound, not as "reached" : boarding and walking only
        // ever start from arrivals this scan achieved itself
        let mut reached_zero = vec![SecondsSinceDayStart::max(); nb_of_stops];
        reached_zero[origin.idx] = departure_time;

        let mut state = ScanState {
            reached: RoundArrivals::with_round_zero(reached_zero),
            scan_best: vec![SecondsSinceDayStart::max(); nb_of_stops],
            marked: vec![origin],
            is_marked: vec![false; nb_of_stops],
            to_relax: vec![origin],
            is_to_relax: vec![false; nb_of_stops],
        };
        state.scan_best[origin.idx] = departure_time;
        state.is_to_relax[origin.idx] = true;

        // routes serving a marked stop, anchored at the most upstream
        // marked position on their path
        let mut queue: BTreeMap<Route, Position> = BTreeMap::new();

        let mut nb_of_rounds = 0;
        for round in 1..=self.max_rounds {
            if state.marked.is_empty() {
                break;
            }
            nb_of_rounds = round;

            queue.clear();
            let marked = std::mem::take(&mut state.marked);
            for stop in marked {
                state.is_marked[stop.idx] = false;
                for &(route, position) in self.data.routes_of(stop) {
                    match queue.entry(route) {
                        Entry::Vacant(entry) => {
                            entry.insert(position);
                        }
                        Entry::Occupied(mut entry) => {
                            if position < *entry.get() {
                                *entry.get_mut() = position;
                            }
                        }
                    }
                }
            }

            arrivals.push_round_from_last();
            state.reached.push_round_from_last();

            for (&route, &first_position) in queue.iter() {
                self.scan_route(
                    route,
                    first_position,
                    round,
                    date,
                    day_of_week,
                    bounds,
                    &mut arrivals,
                    &mut connections,
                    &mut state,
                );
            }

            self.relax_transfers(round, bounds, &mut arrivals, &mut connections, &mut state);
        }

        debug!(
            "Scan from {} at {} finished after {} rounds",
            self.data.stop_id(origin),
            departure_time,
            nb_of_rounds
        );

        ScanResults {
            k_arrivals: arrivals,
            k_connections: connections,
            origin,
            departure_time,
        }
    }

    /// One pass over a route's path, carrying the currently boarded trip.
    #[allow(clippy::too_many_arguments)]
    fn scan_route(
        &self,
        route: Route,
        first_position: Position,
        round: usize,
        date: NaiveDate,
        day_of_week: Weekday,
        bounds: &ArrivalBounds,
        arrivals: &mut RoundArrivals,
        connections: &mut ConnectionIndex,
        state: &mut ScanState,
    ) {
        let path = self.data.route_path(route);
        let mut onboard: Option<(Trip, Position)> = None;

        for position_idx in first_position.idx..path.len() {
            let position = Position { idx: position_idx };
            let stop = path[position_idx];

            if let Some((trip, board_position)) = onboard {
                if self.data.flow_at(route, position).allows_debark() {
                    let candidate = self.data.arrival_time_of(trip, position);
                    if candidate < state.scan_best[stop.idx] {
                        state.scan_best[stop.idx] = candidate;
                        arrivals.improve(round, stop, candidate);
                        state.reached.improve(round, stop, candidate);
                        connections.insert(
                            stop,
                            round,
                            Connection::Ride {
                                trip,
                                board: board_position,
                                alight: position,
                            },
                        );
                        if !state.is_to_relax[stop.idx] {
                            state.is_to_relax[stop.idx] = true;
                            state.to_relax.push(stop);
                        }
                        if candidate <= bounds.get(stop) && !state.is_marked[stop.idx] {
                            state.is_marked[stop.idx] = true;
                            state.marked.push(stop);
                        }
                    }
                }
            }

            // check whether the previous round lets us catch a trip at
            // this stop that beats the one we are on; only arrivals
            // achieved by this scan are boardable, never the bounds
            if position_idx + 1 < path.len() {
                let previous_arrival = state.reached.arrival(round - 1, stop);
                if previous_arrival.is_max() {
                    continue;
                }
                let catchable_earlier = match onboard {
                    None => true,
                    Some((trip, _)) => previous_arrival < self.data.arrival_time_of(trip, position),
                };
                if catchable_earlier {
                    if let Some(trip) = self.data.best_trip_to_board(
                        route,
                        position,
                        previous_arrival,
                        date,
                        day_of_week,
                    ) {
                        onboard = Some((trip, position));
                    }
                }
            }
        }
    }

    /// One footpath hop from every stop the route scan of this round
    /// improved (plus the origin before the first round). Footpath
    /// improvements never trigger another hop in the same round.
    fn relax_transfers(
        &self,
        round: usize,
        bounds: &ArrivalBounds,
        arrivals: &mut RoundArrivals,
        connections: &mut ConnectionIndex,
        state: &mut ScanState,
    ) {
        let stops_to_relax = std::mem::take(&mut state.to_relax);
        for stop in stops_to_relax {
            state.is_to_relax[stop.idx] = false;
            let at_stop = state.reached.arrival(round, stop);
            if at_stop.is_max() {
                continue;
            }
            let walk_start = at_stop + self.data.interchange(stop);
            for transfer in self.data.transfers_of(stop) {
                if let Some((window_start, window_end)) = self.data.transfer_window(transfer) {
                    if walk_start < window_start || walk_start > window_end {
                        continue;
                    }
                }
                let (to, duration) = self.data.transfer(transfer);
                let candidate = walk_start + duration;
                if candidate < state.scan_best[to.idx] {
                    state.scan_best[to.idx] = candidate;
                    arrivals.improve(round, to, candidate);
                    state.reached.improve(round, to, candidate);
                    connections.insert(to, round, Connection::Footpath { transfer });
                    if candidate <= bounds.get(to) && !state.is_marked[to.idx] {
                        state.is_marked[to.idx] = true;
                        state.marked.push(to);
                    }
                }
            }
        }
    }
}

struct ScanState {
    /// per-round arrivals achieved by this scan alone; round 0 holds
    /// only the origin. Boarding and transfer relaxation read this
    /// table, never the bound-seeded one.
    reached: RoundArrivals,
    /// best arrival achieved by this scan, regardless of the external
    /// bounds
    scan_best: Vec<SecondsSinceDayStart>,
    /// stops to propagate from in the next round
    marked: Vec<Stop>,
    is_marked: Vec<bool>,
    /// stops whose footpaths the upcoming transfer phase must relax
    to_relax: Vec<Stop>,
    is_to_relax: Vec<bool>,
}
