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

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

pub fn from_epoch_millis(millis: i64)->Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// get a DateTime<Utc> from a NaiveDate that is supposed to be in Utc
pub fn naive_utc_date_to_utc_datetime (nd: NaiveDate) -> DateTime<Utc> {
    nd.and_time(NaiveTime::MIN).and_utc()
}

/// parse a HHMM time-of-day spec as used by satellite products (e.g. FIRMS `acq_time`). Shorter digit sequences
/// are zero padded from the left, i.e. "5" is 00:05 and "130" is 01:30
pub fn parse_hhmm (s: &str)->Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) { return None }

    let v: u32 = s.parse().ok()?;
    NaiveTime::from_hms_opt( v / 100, v % 100, 0)
}

const DATE_FORMATS: [&str;3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str;3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// parse a calendar date in one of the common archive formats
pub fn parse_naive_date (s: &str)->Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS.iter().find_map( |fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// lenient date/time parser for archive data. This accepts (in this order)
///   - RFC 3339 / ISO 8601 with offset
///   - naive datetimes (interpreted as UTC)
///   - plain dates (midnight UTC)
///   - integer epoch milliseconds
pub fn parse_utc_datetime (s: &str)->Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() { return None }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_utc())
    }
    if let Some(ndt) = DATETIME_FORMATS.iter().find_map( |fmt| NaiveDateTime::parse_from_str(s, fmt).ok()) {
        return Some(ndt.and_utc())
    }
    if let Some(nd) = parse_naive_date(s) {
        return Some(naive_utc_date_to_utc_datetime(nd))
    }
    if s.len() >= 10 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_epoch_millis)
    }
    None
}

/// the Monday that starts the ISO week of the given date
pub fn iso_week_start (nd: NaiveDate)->NaiveDate {
    let iw = nd.iso_week();
    NaiveDate::from_isoywd_opt( iw.year(), iw.week(), chrono::Weekday::Mon).unwrap_or(nd)
}

/// a type bound for something we can get a date for.
/// The main purpose of this trait is to avoid having to extract DateTime lists out of already existing collections
pub trait Dated {
    fn date (&self)->DateTime<Utc>;
}

impl<Tz:TimeZone> Dated for DateTime<Tz> {
    fn date (&self)->DateTime<Utc> { self.to_utc() }
}

/// the (first,last) dates of a sequence of dated items, or None if there are none
pub fn date_range<'a,T: Dated + 'a> (items: impl IntoIterator<Item=&'a T>)->Option<(DateTime<Utc>,DateTime<Utc>)> {
    items.into_iter().fold( None, |acc, it| {
        let d = it.date();
        match acc {
            None => Some((d,d)),
            Some((first,last)) => Some( (first.min(d), last.max(d)) )
        }
    })
}
