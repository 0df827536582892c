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
#![allow(unused)]

//! common types and functions shared by ODIN fire data crates. This crate should stay domain agnostic, i.e.
//! it must not depend on any fire or hotspot specific type

use std::f64::consts::{PI as STD_PI};

use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod collections;
pub mod datetime;
pub mod stats;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn sqrt(x:f64) -> f64 { x.sqrt() }
#[inline(always)] pub fn rad(x:f64)->f64 { x.to_radians() }

/// clamp `x` into `[min,max]`. Unlike `f64::clamp` this does not panic if min > max (in which case min wins)
#[inline]
pub fn clip (x: f64, min: f64, max: f64)->f64 {
    if x > max { if max < min { min } else { max } } else if x < min { min } else { x }
}

// a global fn that can be used with serde(skip_serializing_if="odin_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }


/// a generic bounding box without semantics for the coordinate type
/// (x corresponds to west/east, y to south/north)
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive + PartialOrd> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    /// inclusive containment test. Note this does not handle boxes that cross the antimeridian
    pub fn contains (&self, x: T, y: T)->bool {
        x >= self.west && x <= self.east && y >= self.south && y <= self.north
    }

    /// true if west <= east and south <= north
    pub fn is_ordered (&self)->bool {
        self.west <= self.east && self.south <= self.north
    }

    pub fn center (&self) -> Option<(f64,f64)> {
        let x = (self.west + self.east).to_f64()?;
        let y = (self.south + self.north).to_f64()?;
        Some( (x / 2.0, y / 2.0) )
    }
}

/// a simple incremental min/max/avg accumulator
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct MinMaxAvg {
    pub n: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64
}

impl MinMaxAvg {
    pub fn new()->Self { MinMaxAvg { n: 0, min: f64::MAX, max: f64::MIN, avg: f64::NAN } }

    pub fn from_values<'a> (values: impl IntoIterator<Item=&'a f64>)->Self {
        values.into_iter().fold( MinMaxAvg::new(), |mut acc, x| { acc.add(*x); acc })
    }
    
    /// add a new observation
    pub fn add (&mut self, x: f64) {
        self.n += 1;

        if self.n > 1 {
            self.avg = self.avg + (x - self.avg) / self.n as f64;
            if x < self.min { self.min = x }
            if x > self.max { self.max = x }
        } else {
            self.min = x;
            self.max = x;
            self.avg = x;
        }
    }

    pub fn is_empty (&self)->bool { self.n == 0 }

    /// the observed value range, or None if there were no observations
    pub fn range (&self)->Option<(f64,f64)> {
        if self.n > 0 { Some( (self.min, self.max) ) } else { None }
    }
}

impl Default for MinMaxAvg {
    fn default()->Self { MinMaxAvg::new() }
}

pub const PI: f64 = STD_PI;
