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

//! Ready-made aggregation strategies.

use std::collections::{HashMap, HashSet};

use super::PatternAggregator;
use crate::engine::raptor::ScanResults;
use crate::response::{reconstruct, reconstruct_round, Journey};
use crate::transit_data::{Stop, TransitData};

/// The deduplicated stop-sequence skeletons reaching each destination :
/// for every journey found over the day, the chain of stops where a
/// vehicle is boarded or left, or a footpath is taken. Intermediate
/// stops ridden through are deliberately absent.
#[derive(Debug, Default)]
pub struct PatternCollection {
    patterns: HashMap<Stop, HashSet<Vec<Stop>>>,
}

impl PatternCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatternAggregator for PatternCollection {
    type Output = HashMap<Stop, HashSet<Vec<Stop>>>;

    fn add(&mut self, results: &ScanResults, data: &TransitData) {
        for stop in results.k_connections.stops_with_connections() {
            let rounds: Vec<usize> = results.k_connections.rounds_at(stop).collect();
            for round in rounds {
                if let Some(journey) = reconstruct_round(results, data, stop, round) {
                    let mut skeleton = Vec::with_capacity(journey.legs().len() + 1);
                    skeleton.push(journey.first_stop());
                    for leg in journey.legs() {
                        skeleton.push(leg.to());
                    }
                    self.patterns.entry(stop).or_default().insert(skeleton);
                }
            }
        }
    }

    fn finalize(self) -> Self::Output {
        self.patterns
    }
}

/// A flat list of every journey found towards a fixed set of
/// destinations, across all departure times.
#[derive(Debug)]
pub struct JourneyCollection {
    destinations: Vec<Stop>,
    journeys: Vec<Journey>,
}

impl JourneyCollection {
    pub fn new(destinations: Vec<Stop>) -> Self {
        Self {
            destinations,
            journeys: Vec::new(),
        }
    }
}

impl PatternAggregator for JourneyCollection {
    type Output = Vec<Journey>;

    fn add(&mut self, results: &ScanResults, data: &TransitData) {
        for &destination in &self.destinations {
            self.journeys.extend(reconstruct(results, data, destination));
        }
    }

    fn finalize(self) -> Self::Output {
        self.journeys
    }
}
