/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use odin_firemap::period::{Granularity, Season, SeasonTable, period_of, season_name};

#[test]
fn test_period_labels()->Result<()> {
    let seasons = SeasonTable::default();
    let dt = Utc.with_ymd_and_hms(2023, 7, 4, 10, 0, 0).unwrap();

    let key = period_of( &dt, Granularity::Yearly, &seasons)?;
    assert_eq!( (key.label.as_str(), key.start), ("2023", NaiveDate::from_ymd_opt(2023,1,1).unwrap()));

    let key = period_of( &dt, Granularity::Monthly, &seasons)?;
    assert_eq!( (key.label.as_str(), key.start), ("2023-07", NaiveDate::from_ymd_opt(2023,7,1).unwrap()));

    let key = period_of( &dt, Granularity::Weekly, &seasons)?;
    assert_eq!( (key.label.as_str(), key.start), ("2023-W27", NaiveDate::from_ymd_opt(2023,7,3).unwrap()));

    let key = period_of( &dt, Granularity::Seasonal, &seasons)?;
    assert_eq!( (key.label.as_str(), key.start), ("2023-Summer", NaiveDate::from_ymd_opt(2023,6,1).unwrap()));
    Ok(())
}

#[test]
fn test_iso_week_year_boundary()->Result<()> {
    // Jan 1 2021 is a Friday and belongs to ISO week 53 of 2020
    let dt = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let key = period_of( &dt, Granularity::Weekly, &SeasonTable::default())?;
    assert_eq!( key.label, "2020-W53");
    assert_eq!( key.start, NaiveDate::from_ymd_opt(2020,12,28).unwrap());
    Ok(())
}

#[test]
fn test_winter_wraps_year()->Result<()> {
    let seasons = SeasonTable::default();

    let dec = Utc.with_ymd_and_hms(2023, 12, 20, 0, 0, 0).unwrap();
    let jan = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let feb = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();

    for dt in [dec, jan, feb] {
        let key = period_of( &dt, Granularity::Seasonal, &seasons)?;
        println!("{} -> {} ({})", dt, key, key.start);
        assert_eq!( key.label, "2023-Winter");
        assert_eq!( key.start, NaiveDate::from_ymd_opt(2023,12,1).unwrap());
    }
    assert_eq!( season_name( &jan, &seasons), "Winter");
    Ok(())
}

#[test]
fn test_season_table_validation() {
    assert!( SeasonTable::default().validate().is_ok());

    let incomplete = SeasonTable( vec![ Season::new("Dry", &[5,6,7,8,9,10]), Season::new("Wet", &[11,12,1,2,3]) ]);
    assert!( incomplete.validate().is_err()); // April missing

    let overlapping = SeasonTable( vec![ Season::new("Dry", &[4,5,6,7,8,9,10]), Season::new("Wet", &[10,11,12,1,2,3]) ]);
    assert!( overlapping.validate().is_err());

    let custom = SeasonTable( vec![ Season::new("Dry", &[4,5,6,7,8,9,10]), Season::new("Wet", &[11,12,1,2,3]) ]);
    assert!( custom.validate().is_ok());

    let dt = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let key = period_of( &dt, Granularity::Seasonal, &custom).unwrap();
    assert_eq!( key.label, "2023-Wet");
    assert_eq!( key.start, NaiveDate::from_ymd_opt(2023,11,1).unwrap());
}

#[test]
fn test_granularity_from_str() {
    assert_eq!( "monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
    assert_eq!( "Weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
    assert!( "daily".parse::<Granularity>().is_err());
    assert_eq!( Granularity::Seasonal.to_string(), "seasonal");
}
