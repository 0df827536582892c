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

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use odin_common::datetime::*;

#[test]
fn test_parse_hhmm() {
    assert_eq!( parse_hhmm("0142"), NaiveTime::from_hms_opt(1, 42, 0));
    assert_eq!( parse_hhmm("142"), NaiveTime::from_hms_opt(1, 42, 0));
    assert_eq!( parse_hhmm("5"), NaiveTime::from_hms_opt(0, 5, 0));
    assert_eq!( parse_hhmm("2359"), NaiveTime::from_hms_opt(23, 59, 0));
    assert_eq!( parse_hhmm("2400"), None);
    assert_eq!( parse_hhmm("1260"), None);
    assert_eq!( parse_hhmm("12:30"), None);
    assert_eq!( parse_hhmm(""), None);
}

#[test]
fn test_parse_dates() {
    let d = NaiveDate::from_ymd_opt(2023, 7, 15);
    assert_eq!( parse_naive_date("2023-07-15"), d);
    assert_eq!( parse_naive_date("2023/07/15"), d);
    assert_eq!( parse_naive_date("07/15/2023"), d);
    assert_eq!( parse_naive_date("15.07.2023"), None);

    let dt = Utc.with_ymd_and_hms(2023, 7, 15, 10, 30, 0).unwrap();
    assert_eq!( parse_utc_datetime("2023-07-15T10:30:00Z"), Some(dt));
    assert_eq!( parse_utc_datetime("2023-07-15T12:30:00+02:00"), Some(dt));
    assert_eq!( parse_utc_datetime("2023-07-15 10:30:00"), Some(dt));
    assert_eq!( parse_utc_datetime(&dt.timestamp_millis().to_string()), Some(dt));
    assert_eq!( parse_utc_datetime("2023-07-15"), Some( Utc.with_ymd_and_hms(2023, 7, 15, 0, 0, 0).unwrap()));
    assert_eq!( parse_utc_datetime("yesterday"), None);
}

#[test]
fn test_iso_week_start() {
    let d = NaiveDate::from_ymd_opt(2023, 7, 9).unwrap(); // Sunday
    assert_eq!( iso_week_start(d), NaiveDate::from_ymd_opt(2023, 7, 3).unwrap());
    let d = NaiveDate::from_ymd_opt(2023, 7, 3).unwrap(); // Monday
    assert_eq!( iso_week_start(d), d);
}

#[test]
fn test_date_range() {
    let a = Utc.with_ymd_and_hms(2023, 7, 15, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let c = Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
    assert_eq!( date_range( &[a, b, c]), Some((b, c)));
    let none: [chrono::DateTime<Utc>;0] = [];
    assert_eq!( date_range( &none), None);
}
