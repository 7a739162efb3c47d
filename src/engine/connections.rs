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

//! Backpointer storage filled by the scan : how each stop's arrival
//! time was achieved in each round.

use crate::time::SecondsSinceDayStart;
use crate::transit_data::{Position, Stop, Transfer, Trip};

/// How a stop was reached in a round : either by riding a trip between
/// two of its positions, or by walking a footpath from an already
/// reached stop.
///
/// Following a `Ride` backpointer goes to (board stop, round - 1);
/// following a `Footpath` goes to (origin stop, round). The index is
/// built acyclically, so any walk terminates at a stop with no
/// recorded connection (the scan origin, or a stop the bounds stopped
/// propagating from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Ride {
        trip: Trip,
        board: Position,
        alight: Position,
    },
    Footpath {
        transfer: Transfer,
    },
}

/// One connection slot per (stop, round), stored flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIndex {
    slots: Vec<Option<Connection>>,
    stride: usize,
    nb_of_stops: usize,
}

impl ConnectionIndex {
    pub(crate) fn new(nb_of_stops: usize, max_rounds: usize) -> Self {
        let stride = max_rounds + 1;
        Self {
            slots: vec![None; nb_of_stops * stride],
            stride,
            nb_of_stops,
        }
    }

    pub(crate) fn insert(&mut self, stop: Stop, round: usize, connection: Connection) {
        debug_assert!(round >= 1 && round < self.stride);
        self.slots[stop.idx * self.stride + round] = Some(connection);
    }

    pub fn get(&self, stop: Stop, round: usize) -> Option<&Connection> {
        if round >= self.stride {
            return None;
        }
        self.slots[stop.idx * self.stride + round].as_ref()
    }

    /// The rounds for which `stop` has a recorded connection, ascending.
    /// Each such round is a distinct arrival time / boardings trade-off.
    pub fn rounds_at(&self, stop: Stop) -> impl Iterator<Item = usize> + '_ {
        let base = stop.idx * self.stride;
        (0..self.stride).filter(move |round| self.slots[base + round].is_some())
    }

    pub fn has_any(&self, stop: Stop) -> bool {
        self.rounds_at(stop).next().is_some()
    }

    pub fn stops_with_connections(&self) -> impl Iterator<Item = Stop> + '_ {
        (0..self.nb_of_stops)
            .map(|idx| Stop { idx })
            .filter(move |stop| self.has_any(*stop))
    }

    pub fn nb_of_stops(&self) -> usize {
        self.nb_of_stops
    }
}

/// The per-round arrival tables of one scan.
/// Invariant : `arrival(k, stop) <= arrival(k - 1, stop)` for all k >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundArrivals {
    tables: Vec<Vec<SecondsSinceDayStart>>,
}

impl RoundArrivals {
    pub(crate) fn with_round_zero(round_zero: Vec<SecondsSinceDayStart>) -> Self {
        Self {
            tables: vec![round_zero],
        }
    }

    /// Opens round `tables.len()` carrying the previous round forward.
    pub(crate) fn push_round_from_last(&mut self) {
        let last = self
            .tables
            .last()
            .expect("round arrivals always hold round 0")
            .clone();
        self.tables.push(last);
    }

    pub(crate) fn improve(&mut self, round: usize, stop: Stop, time: SecondsSinceDayStart) {
        let slot = &mut self.tables[round][stop.idx];
        if time < *slot {
            *slot = time;
        }
    }

    pub fn arrival(&self, round: usize, stop: Stop) -> SecondsSinceDayStart {
        self.tables[round][stop.idx]
    }

    pub fn nb_of_rounds(&self) -> usize {
        self.tables.len()
    }

    pub fn round_table(&self, round: usize) -> &[SecondsSinceDayStart] {
        &self.tables[round]
    }

    pub fn last_round(&self) -> &[SecondsSinceDayStart] {
        self.tables
            .last()
            .expect("round arrivals always hold round 0")
    }
}
