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

//! per-region totals over the full cleaned population (input for choropleth display)

use std::collections::BTreeMap;
use serde::{Serialize,Deserialize};

use crate::clean::CleanRecord;

#[derive(Debug,Clone,Copy,Default,Serialize,Deserialize,PartialEq)]
pub struct RegionSummary {
    pub total_area: f64,
    pub count: usize,
}

/// group records by region label and sum up their fire area
pub fn summarize_regions (records: &[CleanRecord])->BTreeMap<String,RegionSummary> {
    let mut summaries: BTreeMap<String,RegionSummary> = BTreeMap::new();
    for r in records {
        let s = summaries.entry( r.region.clone()).or_default();
        s.total_area += r.fire_area;
        s.count += 1;
    }
    summaries
}
