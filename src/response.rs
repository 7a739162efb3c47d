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

//! Journeys rebuilt from a scan's connection index.

use crate::engine::connections::Connection;
use crate::engine::raptor::ScanResults;
use crate::time::SecondsSinceDayStart;
use crate::transit_data::{BadRequest, Position, Stop, Transfer, TransitData, Trip};

/// One continuous segment of a journey : a ride on a contiguous
/// stop-time range of one trip, or a walk along a footpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Ride {
        trip: Trip,
        board: Position,
        alight: Position,
        from: Stop,
        to: Stop,
        departure: SecondsSinceDayStart,
        arrival: SecondsSinceDayStart,
    },
    Walk {
        from: Stop,
        to: Stop,
        departure: SecondsSinceDayStart,
        arrival: SecondsSinceDayStart,
    },
}

impl Leg {
    pub fn from(&self) -> Stop {
        match self {
            Leg::Ride { from, .. } | Leg::Walk { from, .. } => *from,
        }
    }

    pub fn to(&self) -> Stop {
        match self {
            Leg::Ride { to, .. } | Leg::Walk { to, .. } => *to,
        }
    }

    pub fn departure(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Ride { departure, .. } | Leg::Walk { departure, .. } => *departure,
        }
    }

    pub fn arrival(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Ride { arrival, .. } | Leg::Walk { arrival, .. } => *arrival,
        }
    }

    pub fn is_ride(&self) -> bool {
        matches!(self, Leg::Ride { .. })
    }
}

/// An ordered sequence of legs, with consistent chaining :
/// `legs[i].to() == legs[i + 1].from()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<Leg>,
}

impl Journey {
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn first_stop(&self) -> Stop {
        self.legs.first().expect("a journey has at least one leg").from()
    }

    pub fn last_stop(&self) -> Stop {
        self.legs.last().expect("a journey has at least one leg").to()
    }

    pub fn departure_time(&self) -> SecondsSinceDayStart {
        self.legs.first().expect("a journey has at least one leg").departure()
    }

    pub fn arrival_time(&self) -> SecondsSinceDayStart {
        self.legs.last().expect("a journey has at least one leg").arrival()
    }

    pub fn nb_of_rides(&self) -> usize {
        self.legs.iter().filter(|leg| leg.is_ride()).count()
    }
}

/// One journey per round that reached `destination`, ascending in round
/// number. Each journey is a distinct trade-off between arrival time and
/// number of boardings. An unreached destination yields an empty list.
pub fn reconstruct(
    results: &ScanResults,
    data: &TransitData,
    destination: Stop,
) -> Vec<Journey> {
    results
        .k_connections
        .rounds_at(destination)
        .filter_map(|round| reconstruct_round(results, data, destination, round))
        .collect()
}

pub fn reconstruct_by_id(
    results: &ScanResults,
    data: &TransitData,
    destination_id: &str,
) -> Result<Vec<Journey>, BadRequest> {
    let destination = data
        .stop_by_id(destination_id)
        .ok_or_else(|| BadRequest::UnknownStop(destination_id.to_string()))?;
    Ok(reconstruct(results, data, destination))
}

enum RawLeg {
    Ride {
        trip: Trip,
        board: Position,
        alight: Position,
    },
    Walk {
        transfer: Transfer,
        to: Stop,
    },
}

/// Walks the backpointers from `(destination, round)` to the journey
/// start, then rebuilds the legs in travel order.
///
/// A ride backpointer continues at its board stop, one round down; a
/// footpath backpointer continues at its origin stop in the same round.
/// The walk stops at round 0, or at a stop with no recorded connection
/// (the scan origin, or a stop whose onward propagation the bounds
/// pruned in an earlier round).
pub fn reconstruct_round(
    results: &ScanResults,
    data: &TransitData,
    destination: Stop,
    round: usize,
) -> Option<Journey> {
    results.k_connections.get(destination, round)?;

    let mut raw_legs = Vec::new();
    let mut stop = destination;
    let mut current_round = round;
    while current_round > 0 {
        match results.k_connections.get(stop, current_round) {
            None => break,
            Some(Connection::Ride {
                trip,
                board,
                alight,
            }) => {
                raw_legs.push(RawLeg::Ride {
                    trip: *trip,
                    board: *board,
                    alight: *alight,
                });
                let path = data.route_path(data.route_of(*trip));
                stop = path[board.idx];
                current_round -= 1;
            }
            Some(Connection::Footpath { transfer }) => {
                raw_legs.push(RawLeg::Walk {
                    transfer: *transfer,
                    to: stop,
                });
                stop = transfer.from_stop();
            }
        }
    }
    raw_legs.reverse();

    // `stop` is now the journey start; its time at round 0 is the scan
    // departure time, or the seeded bound for a bound-rooted journey
    let mut current_time = results.k_arrivals.arrival(0, stop);
    let mut legs = Vec::with_capacity(raw_legs.len());
    for raw_leg in raw_legs {
        match raw_leg {
            RawLeg::Ride {
                trip,
                board,
                alight,
            } => {
                let path = data.route_path(data.route_of(trip));
                let arrival = data.arrival_time_of(trip, alight);
                legs.push(Leg::Ride {
                    trip,
                    board,
                    alight,
                    from: path[board.idx],
                    to: path[alight.idx],
                    departure: data.departure_time_of(trip, board),
                    arrival,
                });
                current_time = arrival;
            }
            RawLeg::Walk { transfer, to } => {
                let from = transfer.from_stop();
                let (resolved_to, duration) = data.transfer(transfer);
                debug_assert_eq!(resolved_to, to);
                let departure = current_time + data.interchange(from);
                let arrival = departure + duration;
                legs.push(Leg::Walk {
                    from,
                    to,
                    departure,
                    arrival,
                });
                current_time = arrival;
            }
        }
    }

    Some(Journey { legs })
}
