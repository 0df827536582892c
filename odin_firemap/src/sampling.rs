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

//! density sampling. Groups that exceed the configured cap are reduced to a weighted subsample (without
//! replacement) in which the selection probability of an item is proportional to `|intensity| * fire_area`, so that
//! large and intense fires are preferred. Sampling is reproducible for a given seed

use std::collections::BTreeMap;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Serialize,Deserialize};
use tracing::debug;

use crate::aggregate::Aggregate;
use crate::clean::CleanRecord;
use crate::config::SamplingConfig;
use crate::period::PeriodKey;

/// something that can be density sampled
pub trait SampleWeight {
    /// non-negative selection weight
    fn sample_weight (&self)->f64;
}

impl SampleWeight for CleanRecord {
    fn sample_weight (&self)->f64 { self.intensity.abs() * self.fire_area }
}

impl SampleWeight for Aggregate {
    fn sample_weight (&self)->f64 { self.intensity.avg.abs() * self.fire_area_sum }
}

/// what happened to one period group
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct SamplingDecision {
    pub period: String,
    pub input: usize,
    pub kept: usize,
}

impl SamplingDecision {
    pub fn was_sampled (&self)->bool { self.kept < self.input }
}

/// the number of items to keep for a group of the given size. Groups at or under the cap are kept completely,
/// larger groups are reduced to `min(cap, max(1, round(n * fraction)))`
pub fn sample_size (n: usize, config: &SamplingConfig)->usize {
    if n <= config.max_per_period {
        n
    } else {
        let fractional = (n as f64 * config.sample_fraction).round_ties_even().max(1.0) as usize;
        fractional.min(config.max_per_period).min(n)
    }
}

/// the RNG seed for a group, derived from the configured seed and the group label. This makes the sample of a
/// group independent of which other groups exist in the batch
pub fn group_seed (seed: u64, label: &str)->u64 {
    // 64bit FNV-1a
    let hash = label.bytes().fold( 0xcbf29ce484222325u64, |h,b| (h ^ b as u64).wrapping_mul(0x100000001b3));
    seed ^ hash
}

/// weighted sampling without replacement (Efraimidis-Spirakis). Each item gets a key `ln(u)/w` with u uniform in
/// (0,1], the `k` items with the largest keys are selected. Items with zero weight are only selected if there are
/// not enough items with positive weight. The selected items keep their original order
pub fn sample_weighted<T: SampleWeight> (items: Vec<T>, k: usize, rng: &mut impl Rng)->Vec<T> {
    if k >= items.len() { return items }

    let mut keys: Vec<(usize,f64)> = items.iter().enumerate().map( |(i,it)| {
        let u: f64 = 1.0 - rng.random::<f64>();
        let w = it.sample_weight();
        let key = if w.is_finite() && w > 0.0 { u.ln() / w } else { f64::NEG_INFINITY };
        (i,key)
    }).collect();

    keys.sort_by( |a,b| b.1.total_cmp(&a.1).then( a.0.cmp(&b.0)));
    let mut selected = vec![false; items.len()];
    for (i,_) in keys.iter().take(k) { selected[*i] = true }

    items.into_iter().zip( selected.into_iter()).filter_map( |(it,sel)| sel.then_some(it)).collect()
}

/// sample a single group
pub fn sample_group<T: SampleWeight> (items: Vec<T>, label: &str, config: &SamplingConfig)->Vec<T> {
    let k = sample_size( items.len(), config);
    if k == items.len() { return items }

    let mut rng = StdRng::seed_from_u64( group_seed( config.seed, label));
    sample_weighted( items, k, &mut rng)
}

/// partition items by period and sample each period group independently.
/// The result is in period order, with items of each period in their input order
pub fn sample_by_period<T,F> (items: Vec<T>, period_fn: F, config: &SamplingConfig)->(Vec<T>,Vec<SamplingDecision>)
    where T: SampleWeight, F: Fn(&T)->&PeriodKey
{
    let mut groups: BTreeMap<PeriodKey,Vec<T>> = BTreeMap::new();
    for it in items {
        let key = period_fn(&it).clone();
        groups.entry(key).or_default().push(it);
    }

    let mut result = Vec::new();
    let mut decisions = Vec::with_capacity(groups.len());
    for (period, group) in groups {
        let input = group.len();
        let sampled = sample_group( group, &period.label, config);
        let decision = SamplingDecision { period: period.label, input, kept: sampled.len() };
        if decision.was_sampled() {
            debug!("period {}: sampled {} of {} features", decision.period, decision.kept, decision.input);
        }
        decisions.push(decision);
        result.extend( sampled);
    }

    (result, decisions)
}
