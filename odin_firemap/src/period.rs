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

//! temporal labeling of fire records: seasons and aggregation periods

use std::fmt;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Serialize,Deserialize};
use strum::{Display,EnumString};
use odin_common::datetime::iso_week_start;

use crate::errors::{Result, config_error};

/// temporal aggregation granularity
#[derive(Debug,Clone,Copy,Serialize,Deserialize,PartialEq,Eq,Hash,Display,EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Granularity {
    Yearly,
    Monthly,
    Weekly,
    Seasonal
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct Season {
    pub name: String,

    /// calendar months (1-12) of this season. The first entry is the month the season starts with
    pub months: Vec<u32>,
}

impl Season {
    pub fn new (name: impl ToString, months: &[u32])->Self {
        Season { name: name.to_string(), months: months.to_vec() }
    }

    pub fn start_month (&self)->u32 { self.months.first().copied().unwrap_or(1) }

    /// the year the season containing the given date started in. Seasons that wrap around the year end
    /// (e.g. Dec,Jan,Feb) are attributed to the year of their first month
    pub fn start_year (&self, date: NaiveDate)->i32 {
        if date.month() < self.start_month() { date.year() - 1 } else { date.year() }
    }
}

/// month-to-season mapping
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(transparent)]
pub struct SeasonTable (pub Vec<Season>);

impl Default for SeasonTable {
    fn default()->Self {
        SeasonTable( vec![
            Season::new( "Winter", &[12, 1, 2]),
            Season::new( "Spring", &[3, 4, 5]),
            Season::new( "Summer", &[6, 7, 8]),
            Season::new( "Fall", &[9, 10, 11]),
        ])
    }
}

impl SeasonTable {
    pub fn season_of_month (&self, month: u32)->Option<&Season> {
        self.0.iter().find( |s| s.months.contains(&month))
    }

    pub fn season_of (&self, date: NaiveDate)->Option<&Season> {
        self.season_of_month( date.month())
    }

    pub fn seasons (&self)->&[Season] { &self.0 }

    /// each month has to be assigned to exactly one season, and season names have to be unique
    pub fn validate (&self)->Result<()> {
        let mut assigned = [0usize; 13];
        for (i,season) in self.0.iter().enumerate() {
            if season.name.is_empty() {
                return Err( config_error!("empty season name"))
            }
            if self.0[..i].iter().any( |s| s.name == season.name) {
                return Err( config_error!("duplicated season {}", season.name))
            }
            for m in &season.months {
                if *m < 1 || *m > 12 {
                    return Err( config_error!("invalid month {} in season {}", m, season.name))
                }
                assigned[*m as usize] += 1;
            }
        }

        let bad: Vec<String> = (1..=12).filter( |m| assigned[*m] != 1).map( |m| m.to_string()).collect();
        if !bad.is_empty() {
            return Err( config_error!("months not assigned to exactly one season: {}", bad.join(",")))
        }
        Ok(())
    }
}

/// the aggregation period a record belongs to. Periods are ordered by their start date
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct PeriodKey {
    pub start: NaiveDate,
    pub label: String,
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// compute the period key of a date for the given granularity
///   - yearly:   "2023"          (starting 2023-01-01)
///   - monthly:  "2023-07"       (starting 2023-07-01)
///   - weekly:   "2023-W27"      (ISO week, starting on its Monday)
///   - seasonal: "2023-Summer"   (starting on the first day of the season's first month)
pub fn period_of (date: &DateTime<Utc>, granularity: Granularity, seasons: &SeasonTable)->Result<PeriodKey> {
    let nd = date.date_naive();

    let key = match granularity {
        Granularity::Yearly => {
            PeriodKey { start: first_of(nd.year(), 1)?, label: format!("{}", nd.year()) }
        }
        Granularity::Monthly => {
            PeriodKey { start: first_of(nd.year(), nd.month())?, label: format!("{}-{:02}", nd.year(), nd.month()) }
        }
        Granularity::Weekly => {
            let iw = nd.iso_week();
            PeriodKey { start: iso_week_start(nd), label: format!("{}-W{:02}", iw.year(), iw.week()) }
        }
        Granularity::Seasonal => {
            let season = seasons.season_of(nd).ok_or_else( || config_error!("no season for month {}", nd.month()))?;
            let year = season.start_year(nd);
            PeriodKey { start: first_of(year, season.start_month())?, label: format!("{}-{}", year, season.name) }
        }
    };
    Ok(key)
}

/// the season name of a date, or "Unknown" if the table does not cover its month
pub fn season_name (date: &DateTime<Utc>, seasons: &SeasonTable)->String {
    seasons.season_of( date.date_naive())
        .map( |s| s.name.clone())
        .unwrap_or_else( || "Unknown".to_string())
}

fn first_of (year: i32, month: u32)->Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else( || config_error!("invalid period start {}-{}", year, month))
}
