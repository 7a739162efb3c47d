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

#![allow(dead_code)]

use std::str::FromStr;

use hermod::chrono::{Datelike, NaiveDate};
use hermod::{
    ArrivalBounds, Journey, RaptorScanner, RequestParams, ScanResults, SecondsSinceDayStart, Stop,
    TransitData,
};

pub fn init() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub fn time(text: &str) -> SecondsSinceDayStart {
    SecondsSinceDayStart::from_str(text).unwrap()
}

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::from_str(text).unwrap()
}

pub fn stop(data: &TransitData, id: &str) -> Stop {
    data.stop_by_id(id)
        .unwrap_or_else(|| panic!("unknown stop {}", id))
}

pub fn scan(data: &TransitData, origin: &str, day: &str, departure: &str) -> ScanResults {
    let bounds = ArrivalBounds::unknown(data.nb_of_stops());
    scan_with_bounds(data, &bounds, origin, day, departure)
}

pub fn scan_with_bounds(
    data: &TransitData,
    bounds: &ArrivalBounds,
    origin: &str,
    day: &str,
    departure: &str,
) -> ScanResults {
    let scanner = RaptorScanner::new(data, &RequestParams::default());
    let day = date(day);
    scanner.scan(bounds, stop(data, origin), day, day.weekday(), time(departure))
}

pub fn journeys_to(results: &ScanResults, data: &TransitData, destination: &str) -> Vec<Journey> {
    hermod::reconstruct(results, data, stop(data, destination))
}

/// Checks the chaining invariant of a reconstructed journey.
pub fn assert_chained(journey: &Journey, data: &TransitData, origin: &str, destination: &str) {
    assert_eq!(journey.first_stop(), stop(data, origin));
    assert_eq!(journey.last_stop(), stop(data, destination));
    for legs in journey.legs().windows(2) {
        assert_eq!(legs[0].to(), legs[1].from());
        assert!(legs[0].arrival() <= legs[1].departure());
    }
}
