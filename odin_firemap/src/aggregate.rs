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

//! temporal-spatial aggregation of clean records. This is a two phase operation: [`partition`] assigns each record
//! to exactly one [`GroupKey`] (period and optional spatial bin), [`aggregate_groups`] reduces each group into an
//! [`Aggregate`]. Both are pure functions over the cleaned dataset

use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};
use tracing::debug;
use odin_common::MinMaxAvg;
use odin_common::collections::most_frequent;

use crate::clean::{CleanRecord, UNKNOWN_REGION};
use crate::config::AggregationConfig;
use crate::errors::Result;
use crate::period::{PeriodKey, SeasonTable, period_of, season_name};

/// round to the given number of decimal places, resolving ties to the even neighbour
pub fn round_half_even (x: f64, precision: u32)->f64 {
    let f = 10f64.powi(precision as i32);
    (x * f).round_ties_even() / f
}

/// a lat/lon grid cell. Bin centers are stored as scaled integers so that keys are exact
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct SpatialBin {
    pub lat_idx: i64,
    pub lon_idx: i64,
    pub precision: u32,
}

impl SpatialBin {
    pub fn of (lat: f64, lon: f64, precision: u32)->Self {
        let f = 10f64.powi(precision as i32);
        SpatialBin { 
            lat_idx: (lat * f).round_ties_even() as i64, 
            lon_idx: (lon * f).round_ties_even() as i64, 
            precision 
        }
    }

    pub fn lat (&self)->f64 { self.lat_idx as f64 / 10f64.powi(self.precision as i32) }
    pub fn lon (&self)->f64 { self.lon_idx as f64 / 10f64.powi(self.precision as i32) }
}

/// the group a record belongs to. Keys are ordered by (period start, lat bin, lon bin)
#[derive(Debug,Clone,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct GroupKey {
    pub period: PeriodKey,
    pub bin: Option<SpatialBin>,
}

/// summary of one (period, bin) group
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct Aggregate {
    pub period: PeriodKey,
    pub lat_bin: Option<f64>,
    pub lon_bin: Option<f64>,

    pub count: usize,

    /// representative point (position of the first record in the group)
    pub latitude: f64,
    pub longitude: f64,

    pub lat: MinMaxAvg,
    pub lon: MinMaxAvg,
    pub brightness: MinMaxAvg,
    pub intensity: MinMaxAvg,
    pub fire_area: MinMaxAvg,
    pub fire_area_sum: f64,

    #[serde(skip_serializing_if = "odin_common::is_none")]
    pub frp_sum: Option<f64>,
    #[serde(skip_serializing_if = "odin_common::is_none")]
    pub frp_mean: Option<f64>,

    /// most common region label of the group
    pub region: String,
    /// most common season name of the group
    pub season: String,
}

/// group record indices by period and (if configured) spatial bin.
/// Every record index occurs in exactly one group, indices within a group are in input order
pub fn partition (records: &[CleanRecord], config: &AggregationConfig, seasons: &SeasonTable)->Result<BTreeMap<GroupKey,Vec<usize>>> {
    let mut groups: BTreeMap<GroupKey,Vec<usize>> = BTreeMap::new();

    for (i,r) in records.iter().enumerate() {
        let period = period_of( &r.datetime, config.granularity, seasons)?;
        let bin = if config.spatial_binning { Some( SpatialBin::of( r.latitude, r.longitude, config.bin_precision)) } else { None };
        groups.entry( GroupKey { period, bin }).or_default().push(i);
    }

    debug!("partitioned {} records into {} {} groups", records.len(), groups.len(), config.granularity);
    Ok(groups)
}

/// reduce partitioned records into aggregates, in group key order
pub fn aggregate_groups (records: &[CleanRecord], groups: &BTreeMap<GroupKey,Vec<usize>>, seasons: &SeasonTable)->Vec<Aggregate> {
    groups.iter()
        .filter_map( |(key,idxs)| reduce_group( key, idxs.iter().map(|i| &records[*i]), seasons))
        .collect()
}

/// partition and reduce in one step
pub fn aggregate (records: &[CleanRecord], config: &AggregationConfig, seasons: &SeasonTable)->Result<Vec<Aggregate>> {
    let groups = partition( records, config, seasons)?;
    Ok( aggregate_groups( records, &groups, seasons) )
}

fn reduce_group<'a> (key: &GroupKey, members: impl Iterator<Item=&'a CleanRecord>, seasons: &SeasonTable)->Option<Aggregate> {
    let members: Vec<&CleanRecord> = members.collect();
    let first = members.first()?;

    let mut lat = MinMaxAvg::new();
    let mut lon = MinMaxAvg::new();
    let mut brightness = MinMaxAvg::new();
    let mut intensity = MinMaxAvg::new();
    let mut fire_area = MinMaxAvg::new();
    let mut frp = MinMaxAvg::new();
    let mut fire_area_sum = 0.0;
    let mut frp_sum = 0.0;

    for r in &members {
        lat.add( r.latitude);
        lon.add( r.longitude);
        brightness.add( r.brightness);
        intensity.add( r.intensity);
        fire_area.add( r.fire_area);
        fire_area_sum += r.fire_area;
        if let Some(v) = r.fire_radiative_power {
            frp.add(v);
            frp_sum += v;
        }
    }

    let region = most_frequent( members.iter().map(|r| r.region.as_str()))
        .unwrap_or(UNKNOWN_REGION)
        .to_string();
    let season = most_frequent( members.iter().map(|r| season_name( &r.datetime, seasons)))
        .unwrap_or_default();

    Some( Aggregate {
        period: key.period.clone(),
        lat_bin: key.bin.map(|b| b.lat()),
        lon_bin: key.bin.map(|b| b.lon()),
        count: members.len(),
        latitude: first.latitude,
        longitude: first.longitude,
        lat, lon, brightness, intensity, fire_area,
        fire_area_sum,
        frp_sum: if frp.is_empty() { None } else { Some(frp_sum) },
        frp_mean: if frp.is_empty() { None } else { Some(frp.avg) },
        region,
        season
    })
}
