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
use hermod::chrono::Weekday;
use hermod::modelbuilder::TimetableBuilder;
use hermod::{Leg, TransitData};
use utils::{init, journeys_to, scan, stop, time};

fn weekday_timetable() -> Result<TransitData, Error> {
    let data = TimetableBuilder::new()
        .weekly_calendar(
            "weekdays",
            "2020-01-01",
            "2020-12-31",
            &[
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        )
        .trip("toto", "weekdays", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .build()?;
    Ok(data)
}

#[test]
fn test_weekly_flags_select_running_days() -> Result<(), Error> {
    init();

    let data = weekday_timetable()?;

    // 2020-01-06 is a Monday, 2020-01-11 a Saturday
    let monday = scan(&data, "A", "2020-01-06", "09:00:00");
    assert_eq!(journeys_to(&monday, &data, "B").len(), 1);

    let saturday = scan(&data, "A", "2020-01-11", "09:00:00");
    assert!(journeys_to(&saturday, &data, "B").is_empty());

    Ok(())
}

#[test]
fn test_exclude_date_kills_the_trip() -> Result<(), Error> {
    init();

    let data = TimetableBuilder::new()
        .weekly_calendar(
            "weekdays",
            "2020-01-01",
            "2020-12-31",
            &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        )
        .exclude("weekdays", "2020-01-06")
        .trip("toto", "weekdays", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .build()?;

    let excluded_monday = scan(&data, "A", "2020-01-06", "09:00:00");
    assert!(journeys_to(&excluded_monday, &data, "B").is_empty());

    let next_monday = scan(&data, "A", "2020-01-13", "09:00:00");
    assert_eq!(journeys_to(&next_monday, &data, "B").len(), 1);

    Ok(())
}

#[test]
fn test_include_date_resurrects_the_trip() -> Result<(), Error> {
    init();

    let data = TimetableBuilder::new()
        .weekly_calendar(
            "weekdays",
            "2020-01-01",
            "2020-12-31",
            &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        )
        .include("weekdays", "2020-01-11")
        .trip("toto", "weekdays", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .build()?;

    // the weekly flag for Saturday is off, but the date is included
    let saturday = scan(&data, "A", "2020-01-11", "09:00:00");
    assert_eq!(journeys_to(&saturday, &data, "B").len(), 1);

    Ok(())
}

#[test]
fn test_same_departure_tie_break_is_deterministic() -> Result<(), Error> {
    init();

    let data = TimetableBuilder::new()
        .calendar("service1", &["2020-01-01"])
        .trip("zebra", "service1", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .trip("aardvark", "service1", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .build()?;

    // both trips depart at the same instant : the earliest trip id wins
    let results = scan(&data, "A", "2020-01-01", "09:00:00");
    let journeys = journeys_to(&results, &data, "B");
    assert_eq!(journeys.len(), 1);
    match journeys[0].legs()[0] {
        Leg::Ride { trip, .. } => assert_eq!(data.trip_id(trip), "aardvark"),
        Leg::Walk { .. } => panic!("expected a ride leg"),
    }

    // scanning again yields the exact same choice
    let again = scan(&data, "A", "2020-01-01", "09:00:00");
    assert_eq!(results, again);

    Ok(())
}

#[test]
fn test_departure_times_are_date_scoped() -> Result<(), Error> {
    init();

    let data = TimetableBuilder::new()
        .calendar("jan1", &["2020-01-01"])
        .calendar("jan2", &["2020-01-02"])
        .trip("first", "jan1", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "08:30:00", "08:30:00");
        })
        .trip("second", "jan1", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .trip("other_day", "jan2", |t| {
            t.st("A", "09:00:00", "09:00:00")
                .st("B", "09:30:00", "09:30:00");
        })
        .build()?;

    let departures = data.departure_times_at(stop(&data, "A"), utils::date("2020-01-01"));
    assert_eq!(departures, vec![time("08:00:00"), time("10:00:00")]);

    Ok(())
}
