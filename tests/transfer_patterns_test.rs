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

mod utils;

use anyhow::Error;
use hermod::modelbuilder::TimetableBuilder;
use hermod::transfer_patterns::collectors::{JourneyCollection, PatternCollection};
use hermod::{
    PatternAggregator, RequestParams, ScanResults, SecondsSinceDayStart, TransferPatternGenerator,
    TransitData,
};
use utils::{date, init, stop, time};

/// Records the departure time of every scan handed to `add`, checking
/// the ascending call order promised by the orchestrator.
struct RecordingAggregator {
    departures: Vec<SecondsSinceDayStart>,
}

impl PatternAggregator for RecordingAggregator {
    type Output = Vec<SecondsSinceDayStart>;

    fn add(&mut self, results: &ScanResults, _data: &TransitData) {
        if let Some(last) = self.departures.last() {
            assert!(*last < results.departure_time());
        }
        self.departures.push(results.departure_time());
    }

    fn finalize(self) -> Self::Output {
        self.departures
    }
}

fn two_departure_timetable() -> Result<TransitData, Error> {
    let data = TimetableBuilder::new()
        .calendar("service1", &["2020-01-01"])
        .trip("morning", "service1", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "08:15:00", "08:15:00")
                .st("C", "08:30:00", "08:30:00");
        })
        .trip("noon", "service1", |t| {
            t.st("A", "09:00:00", "09:00:00")
                .st("B", "09:15:00", "09:15:00")
                .st("C", "09:30:00", "09:30:00");
        })
        .build()?;
    Ok(data)
}

#[test]
fn test_one_scan_per_departure_in_ascending_order() -> Result<(), Error> {
    init();

    let data = two_departure_timetable()?;
    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());
    let departures = generator.create(
        stop(&data, "A"),
        date("2020-01-01"),
        RecordingAggregator {
            departures: Vec::new(),
        },
    );

    assert_eq!(departures, vec![time("08:00:00"), time("09:00:00")]);

    Ok(())
}

#[test]
fn test_patterns_are_deduplicated_across_departures() -> Result<(), Error> {
    init();

    let data = two_departure_timetable()?;
    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());
    let patterns = generator.create(
        stop(&data, "A"),
        date("2020-01-01"),
        PatternCollection::new(),
    );

    // both departures ride the same stop sequence : one skeleton each
    let to_b = &patterns[&stop(&data, "B")];
    assert_eq!(to_b.len(), 1);
    assert!(to_b.contains(&vec![stop(&data, "A"), stop(&data, "B")]));

    let to_c = &patterns[&stop(&data, "C")];
    assert_eq!(to_c.len(), 1);
    assert!(to_c.contains(&vec![stop(&data, "A"), stop(&data, "C")]));

    Ok(())
}

#[test]
fn test_patterns_keep_all_pareto_skeletons() -> Result<(), Error> {
    init();

    let data = TimetableBuilder::new()
        .calendar("service1", &["2020-01-01"])
        .trip("direct", "service1", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "08:15:00", "08:15:00")
                .st("C", "08:30:00", "08:30:00");
        })
        .trip("feeder", "service1", |t| {
            t.st("D", "08:14:00", "08:15:00")
                .st("C", "08:20:00", "08:20:00");
        })
        .footpath("A", "D", "00:10:00")
        .build()?;

    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());
    let patterns = generator.create(
        stop(&data, "A"),
        date("2020-01-01"),
        PatternCollection::new(),
    );

    let to_c = &patterns[&stop(&data, "C")];
    assert_eq!(to_c.len(), 2);
    assert!(to_c.contains(&vec![stop(&data, "A"), stop(&data, "C")]));
    assert!(to_c.contains(&vec![
        stop(&data, "A"),
        stop(&data, "D"),
        stop(&data, "C")
    ]));

    Ok(())
}

#[test]
fn test_carried_bound_does_not_lose_patterns() -> Result<(), Error> {
    init();

    // the noon trip is dominated by waiting for nothing : it adds no new
    // pattern, and the carried bound must not remove the existing ones
    let data = two_departure_timetable()?;
    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());

    let patterns = generator.create(
        stop(&data, "A"),
        date("2020-01-01"),
        PatternCollection::new(),
    );
    assert_eq!(patterns[&stop(&data, "B")].len(), 1);
    assert_eq!(patterns[&stop(&data, "C")].len(), 1);

    Ok(())
}

#[test]
fn test_journey_collection_gathers_all_departures() -> Result<(), Error> {
    init();

    let data = two_departure_timetable()?;
    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());
    let journeys = generator.create(
        stop(&data, "A"),
        date("2020-01-01"),
        JourneyCollection::new(vec![stop(&data, "C")]),
    );

    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0].arrival_time(), time("08:30:00"));
    assert_eq!(journeys[1].arrival_time(), time("09:30:00"));

    Ok(())
}

#[test]
fn test_unknown_origin_is_a_bad_request() -> Result<(), Error> {
    init();

    let data = two_departure_timetable()?;
    let generator = TransferPatternGenerator::new(&data, &RequestParams::default());
    let result = generator.create_from_id("nowhere", date("2020-01-01"), PatternCollection::new());
    assert!(result.is_err());

    Ok(())
}
