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

//! basic descriptive statistics over f64 slices. Callers have to make sure the input does not contain NaNs

/// arithmetic mean, None for empty input
pub fn mean (values: &[f64])->Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some( values.iter().sum::<f64>() / values.len() as f64 )
    }
}

/// sample standard deviation (n-1 denominator), None for less than two values
pub fn std_dev (values: &[f64])->Option<f64> {
    let n = values.len();
    if n < 2 { return None }

    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| { let d = x - m; d*d }).sum();
    Some( (ss / (n - 1) as f64).sqrt() )
}

/// return a sorted copy of the input
pub fn sorted (values: &[f64])->Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by( |a,b| a.total_cmp(b));
    v
}

/// the q-quantile (0 <= q <= 1) of already sorted values, using linear interpolation between the closest ranks
/// (position = (n-1)*q). None for empty input
pub fn quantile_sorted (sorted: &[f64], q: f64)->Option<f64> {
    let n = sorted.len();
    if n == 0 { return None }

    let q = q.clamp(0.0, 1.0);
    let pos = (n - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some( sorted[lo] + (sorted[hi] - sorted[lo]) * frac )
}

/// the q-quantile of unsorted values (see [`quantile_sorted`])
pub fn quantile (values: &[f64], q: f64)->Option<f64> {
    quantile_sorted( &sorted(values), q)
}

/// interquartile range fence of a population
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64
}

impl IqrFence {
    pub fn iqr (&self)->f64 { self.q3 - self.q1 }

    /// inclusive range test
    pub fn admits (&self, x: f64)->bool { x >= self.lower && x <= self.upper }
}

/// compute `[Q1 - k*IQR, Q3 + k*IQR]` for the given values (k is usually 1.5). None for empty input
pub fn iqr_fence (values: &[f64], k: f64)->Option<IqrFence> {
    let s = sorted(values);
    let q1 = quantile_sorted(&s, 0.25)?;
    let q3 = quantile_sorted(&s, 0.75)?;
    let iqr = q3 - q1;

    Some( IqrFence { q1, q3, lower: q1 - k*iqr, upper: q3 + k*iqr } )
}
