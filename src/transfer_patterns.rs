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

//! Full-day orchestration : the scan is re-run for every departure time
//! of an origin, and each scan's connection index is folded into an
//! aggregate by a caller-supplied strategy.

pub mod collectors;

use std::time::SystemTime;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::config::RequestParams;
use crate::engine::raptor::{ArrivalBounds, RaptorScanner, ScanResults};
use crate::transit_data::{BadRequest, Stop, TransitData};

/// Folds successive scan results into a final artifact.
///
/// The orchestrator calls `add` once per departure time, in ascending
/// time order, then `finalize` exactly once — enforced by the by-value
/// receiver.
pub trait PatternAggregator {
    type Output;

    /// Accumulates one scan's connection index (delivered inside its
    /// full scan results so the aggregator can reconstruct journeys).
    fn add(&mut self, results: &ScanResults, data: &TransitData);

    fn finalize(self) -> Self::Output;
}

pub struct TransferPatternGenerator<'data> {
    data: &'data TransitData,
    scanner: RaptorScanner<'data>,
}

impl<'data> TransferPatternGenerator<'data> {
    pub fn new(data: &'data TransitData, params: &RequestParams) -> Self {
        Self {
            data,
            scanner: RaptorScanner::new(data, params),
        }
    }

    /// Runs one scan per valid departure time at `origin` on `date`,
    /// ascending. Each scan is seeded with the best arrivals accumulated
    /// over the earlier departures : a later departure cannot beat an
    /// arrival already achieved by waiting at the origin, so the carried
    /// bound prunes propagation without losing any new pattern.
    ///
    /// The round 1 table is the one carried : it is the fewest-boardings
    /// table, and it already holds the per-stop minimum with the bounds
    /// the scan was seeded with.
    pub fn create<A>(&self, origin: Stop, date: NaiveDate, mut aggregator: A) -> A::Output
    where
        A: PatternAggregator,
    {
        let day_of_week = date.weekday();
        let departures = self.data.departure_times_at(origin, date);
        info!(
            "Generating transfer patterns from {} on {} over {} departures",
            self.data.stop_id(origin),
            date,
            departures.len()
        );
        let timer = SystemTime::now();

        let mut bounds = ArrivalBounds::unknown(self.data.nb_of_stops());
        for departure_time in departures {
            let results = self
                .scanner
                .scan(&bounds, origin, date, day_of_week, departure_time);
            if results.k_arrivals.nb_of_rounds() > 1 {
                bounds.merge_round(results.k_arrivals.round_table(1));
            }
            aggregator.add(&results, self.data);
        }

        debug!(
            "Transfer patterns of {} computed in {} ms",
            self.data.stop_id(origin),
            timer.elapsed().unwrap().as_millis()
        );

        aggregator.finalize()
    }

    pub fn create_from_id<A>(
        &self,
        origin_id: &str,
        date: NaiveDate,
        aggregator: A,
    ) -> Result<A::Output, BadRequest>
    where
        A: PatternAggregator,
    {
        let origin = self
            .data
            .stop_by_id(origin_id)
            .ok_or_else(|| BadRequest::UnknownStop(origin_id.to_string()))?;
        Ok(self.create(origin, date, aggregator))
    }
}
