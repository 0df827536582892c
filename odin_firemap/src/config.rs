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

//! configuration of the fire map pipeline. All stages get their (immutable) configuration section passed in
//! explicitly, there is no global configuration state. [`FiremapConfig`] is normally read from a RON file such as
//! ```ron
//! FiremapConfig(
//!     cleaning: ( bounds: ( west: -125.0, south: 32.0, east: -114.0, north: 42.0 ) ),
//!     aggregation: ( granularity: Monthly ),
//!     sampling: ( max_per_period: 500, seed: 7 ),
//! )
//! ```
//! where all sections and fields that are not specified use their defaults

use std::{fs, path::Path};
use serde::{Serialize,Deserialize};
use odin_common::BoundingBox;

use crate::errors::{Result, config_error};
use crate::period::{Granularity, SeasonTable};

/// the default North America mask (includes Alaska and eastern Canada)
pub const NORTH_AMERICA: BoundingBox<f64> = BoundingBox { west: -170.0, south: 25.0, east: -50.0, north: 70.0 };

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq,Default)]
#[serde(default)]
pub struct FiremapConfig {
    pub cleaning: CleaningConfig,
    pub seasons: SeasonTable,
    pub aggregation: AggregationConfig,
    pub sampling: SamplingConfig,
    pub render: RenderConfig,
}

impl FiremapConfig {
    pub fn validate (&self)->Result<()> {
        self.cleaning.validate()?;
        self.seasons.validate()?;
        self.aggregation.validate()?;
        self.sampling.validate()?;
        self.render.validate()
    }
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct CleaningConfig {
    /// geographic mask - records outside are dropped
    pub bounds: BoundingBox<f64>,

    /// fence factor k for `[Q1 - k*IQR, Q3 + k*IQR]` outlier rejection
    pub iqr_factor: f64,
}

impl Default for CleaningConfig {
    fn default()->Self {
        CleaningConfig { bounds: NORTH_AMERICA, iqr_factor: 1.5 }
    }
}

impl CleaningConfig {
    pub fn validate (&self)->Result<()> {
        let b = &self.bounds;
        if ![b.west, b.south, b.east, b.north].iter().all(|v| v.is_finite()) {
            return Err( config_error!("non-finite bounds {:?}", b))
        }
        if !b.is_ordered() {
            return Err( config_error!("inverted bounds {:?}", b))
        }
        if b.south < -90.0 || b.north > 90.0 || b.west < -180.0 || b.east > 180.0 {
            return Err( config_error!("bounds outside of geographic range {:?}", b))
        }
        if !(self.iqr_factor.is_finite() && self.iqr_factor >= 0.0) {
            return Err( config_error!("invalid iqr_factor {}", self.iqr_factor))
        }
        Ok(())
    }
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct AggregationConfig {
    pub granularity: Granularity,

    /// number of decimal places lat/lon are rounded to for spatial bins (1 => ~11km at the equator)
    pub bin_precision: u32,

    /// if false we only aggregate by period
    pub spatial_binning: bool,
}

impl Default for AggregationConfig {
    fn default()->Self {
        AggregationConfig { granularity: Granularity::Seasonal, bin_precision: 1, spatial_binning: true }
    }
}

impl AggregationConfig {
    pub fn validate (&self)->Result<()> {
        if self.bin_precision > 6 {
            return Err( config_error!("bin_precision {} exceeds 6 decimal places", self.bin_precision))
        }
        Ok(())
    }
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// density cap - max number of features per period
    pub max_per_period: usize,

    /// fraction of an over-cap group that is kept (the cap still applies)
    pub sample_fraction: f64,

    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default()->Self {
        SamplingConfig { max_per_period: 1000, sample_fraction: 0.2, seed: 42 }
    }
}

impl SamplingConfig {
    pub fn validate (&self)->Result<()> {
        if self.max_per_period == 0 {
            return Err( config_error!("max_per_period has to be positive"))
        }
        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return Err( config_error!("sample_fraction {} not in (0,1]", self.sample_fraction))
        }
        Ok(())
    }
}

/// how z-score intensities are mapped into [0,1]. Exactly one strategy is used for a whole batch
#[derive(Debug,Clone,Copy,Serialize,Deserialize,PartialEq,Default)]
pub enum IntensityNormalization {
    /// rescale with the batch-wide intensity min/max
    #[default]
    MinMax,

    /// clip the z-score to ±sigma and rescale that interval
    SigmaClip(f64),
}

/// display colors for the three intensity classes
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct ColorTable {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl Default for ColorTable {
    fn default()->Self {
        ColorTable { 
            low: "#2196f3".to_string(),    // blue
            medium: "#ff9800".to_string(), // orange
            high: "#f44336".to_string()    // red
        }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub normalization: IntensityNormalization,

    /// web mercator zoom level the pixel radius is computed for
    pub zoom: u8,

    /// linear scale factor applied to the projected pixel radius
    pub scale: f64,

    pub min_radius: f64,
    pub max_radius: f64,

    pub colors: ColorTable,
}

impl Default for RenderConfig {
    fn default()->Self {
        RenderConfig {
            normalization: IntensityNormalization::MinMax,
            zoom: 4,
            scale: 0.05,
            min_radius: 2.0,
            max_radius: 20.0,
            colors: ColorTable::default()
        }
    }
}

impl RenderConfig {
    pub fn validate (&self)->Result<()> {
        if self.zoom > 24 {
            return Err( config_error!("zoom level {} out of range", self.zoom))
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err( config_error!("scale has to be positive: {}", self.scale))
        }
        if !(self.min_radius.is_finite() && self.max_radius.is_finite() && self.min_radius >= 0.0 && self.min_radius <= self.max_radius) {
            return Err( config_error!("invalid radius range [{},{}]", self.min_radius, self.max_radius))
        }
        if let IntensityNormalization::SigmaClip(sigma) = self.normalization {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err( config_error!("invalid sigma clip {}", sigma))
            }
        }
        Ok(())
    }
}

/// read and validate a RON config file
pub fn load_config (path: impl AsRef<Path>)->Result<FiremapConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: FiremapConfig = ron::from_str( &contents)?;
    config.validate()?;
    Ok(config)
}
