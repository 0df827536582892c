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

//! derivation of display parameters (normalized intensity, intensity class and color, pixel radius) for
//! aggregates and clean records. All functions are pure, batch context is passed in explicitly

use chrono::NaiveDate;
use serde::{Serialize,Deserialize};
use strum::Display;
use odin_common::{MinMaxAvg, PI, clip, cos, rad, sqrt};

use crate::aggregate::Aggregate;
use crate::clean::{BatchStats, CleanRecord};
use crate::config::{ColorTable, IntensityNormalization, RenderConfig};
use crate::errors::Result;
use crate::period::{Granularity, PeriodKey, SeasonTable, period_of, season_name};

/// web mercator ground resolution at zoom level 0 on the equator
pub const KM_PER_PIXEL_Z0: f64 = 156.543;

pub const LOW_THRESHOLD: f64 = 0.33;
pub const HIGH_THRESHOLD: f64 = 0.66;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntensityClass {
    Low,
    Medium,
    High
}

impl IntensityClass {
    pub fn color<'a> (&self, colors: &'a ColorTable)->&'a str {
        match self {
            IntensityClass::Low => &colors.low,
            IntensityClass::Medium => &colors.medium,
            IntensityClass::High => &colors.high,
        }
    }
}

/// three way threshold on normalized intensity: `[0,0.33)` low, `[0.33,0.66)` medium, `[0.66,1]` high
pub fn classify (normalized: f64)->IntensityClass {
    if normalized < LOW_THRESHOLD {
        IntensityClass::Low
    } else if normalized < HIGH_THRESHOLD {
        IntensityClass::Medium
    } else {
        IntensityClass::High
    }
}

/// the intensity value range of the population that gets rendered. Records use the range of the clean batch,
/// aggregates the range of their mean intensities
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct IntensityRange {
    pub min: f64,
    pub max: f64,
}

impl IntensityRange {
    pub fn new (min: f64, max: f64)->Self {
        IntensityRange { min, max }
    }

    pub fn of_batch (stats: &BatchStats)->Self {
        IntensityRange { min: stats.intensity_min, max: stats.intensity_max }
    }

    /// None if there are no items
    pub fn of_items<T: Renderable> (items: &[T])->Option<Self> {
        let values: Vec<f64> = items.iter().map( |it| it.intensity()).collect();
        let mma = MinMaxAvg::from_values( &values);
        if mma.is_empty() { None } else { Some( IntensityRange { min: mma.min, max: mma.max }) }
    }

    pub fn span (&self)->f64 {
        self.max - self.min
    }
}

/// map a z-score intensity into [0,1]. The same normalization has to be used for all features of a batch
pub fn normalize_intensity (intensity: f64, normalization: IntensityNormalization, range: &IntensityRange)->f64 {
    match normalization {
        IntensityNormalization::MinMax => {
            let span = range.span();
            if span > 0.0 {
                clip( (intensity - range.min) / span, 0.0, 1.0)
            } else {
                0.5
            }
        }
        IntensityNormalization::SigmaClip(sigma) => {
            if sigma > 0.0 {
                (clip( intensity, -sigma, sigma) + sigma) / (2.0 * sigma)
            } else {
                0.5
            }
        }
    }
}

/// pixel radius of a circular footprint with the given area (km²) at the given latitude (degrees) and web mercator
/// zoom level, scaled linearly and clipped to `[min_radius,max_radius]`
pub fn pixel_radius (area_km2: f64, latitude: f64, zoom: u8, scale: f64, min_radius: f64, max_radius: f64)->f64 {
    let radius_km = sqrt( area_km2.max(0.0) / PI) * cos( rad(latitude));
    let km_per_pixel = KM_PER_PIXEL_Z0 / 2f64.powi(zoom as i32);
    let r = (radius_km / km_per_pixel) * scale;

    if r.is_nan() { min_radius } else { clip( r, min_radius, max_radius) }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Aggregate,
    Record
}

/// the attribute summary shown for a feature (e.g. in a popup)
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct FeatureSummary {
    pub brightness: f64,
    pub fire_area: f64,
    pub intensity: f64,
    pub count: usize,
    pub region: String,
    pub season: String,
    #[serde(skip_serializing_if = "odin_common::is_none")]
    pub frp: Option<f64>,
}

/// a display ready point feature
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct RenderFeature {
    pub latitude: f64,
    pub longitude: f64,
    pub period: String,
    pub period_start: NaiveDate,
    pub kind: FeatureKind,
    pub normalized_intensity: f64,
    pub class: IntensityClass,
    pub color: String,
    pub radius: f64,
    pub summary: FeatureSummary,
}

/// the batch level context for rendering
pub struct RenderContext<'a> {
    pub config: &'a RenderConfig,
    /// the min/max of the population the rendered items were sampled from
    pub intensity_range: IntensityRange,
    pub granularity: Granularity,
    pub seasons: &'a SeasonTable,
}

/// something we can derive a [`RenderFeature`] for
pub trait Renderable {
    const KIND: FeatureKind;

    /// (latitude,longitude) of the feature point
    fn position (&self)->(f64,f64);
    fn intensity (&self)->f64;
    /// footprint area in km²
    fn area (&self)->f64;
    fn period (&self, ctx: &RenderContext)->Result<PeriodKey>;
    fn summary (&self, ctx: &RenderContext)->FeatureSummary;
}

impl Renderable for Aggregate {
    const KIND: FeatureKind = FeatureKind::Aggregate;

    fn position (&self)->(f64,f64) { (self.latitude, self.longitude) }
    fn intensity (&self)->f64 { self.intensity.avg }
    fn area (&self)->f64 { self.fire_area_sum }
    fn period (&self, _ctx: &RenderContext)->Result<PeriodKey> { Ok( self.period.clone()) }

    fn summary (&self, _ctx: &RenderContext)->FeatureSummary {
        FeatureSummary {
            brightness: self.brightness.avg,
            fire_area: self.fire_area_sum,
            intensity: self.intensity.avg,
            count: self.count,
            region: self.region.clone(),
            season: self.season.clone(),
            frp: self.frp_sum,
        }
    }
}

impl Renderable for CleanRecord {
    const KIND: FeatureKind = FeatureKind::Record;

    fn position (&self)->(f64,f64) { (self.latitude, self.longitude) }
    fn intensity (&self)->f64 { self.intensity }
    fn area (&self)->f64 { self.fire_area }
    fn period (&self, ctx: &RenderContext)->Result<PeriodKey> { period_of( &self.datetime, ctx.granularity, ctx.seasons) }

    fn summary (&self, ctx: &RenderContext)->FeatureSummary {
        FeatureSummary {
            brightness: self.brightness,
            fire_area: self.fire_area,
            intensity: self.intensity,
            count: 1,
            region: self.region.clone(),
            season: season_name( &self.datetime, ctx.seasons),
            frp: self.fire_radiative_power,
        }
    }
}

pub fn derive_feature<T: Renderable> (item: &T, ctx: &RenderContext)->Result<RenderFeature> {
    let cfg = ctx.config;
    let (latitude, longitude) = item.position();
    let period = item.period(ctx)?;
    let normalized_intensity = normalize_intensity( item.intensity(), cfg.normalization, &ctx.intensity_range);
    let class = classify( normalized_intensity);
    let radius = pixel_radius( item.area(), latitude, cfg.zoom, cfg.scale, cfg.min_radius, cfg.max_radius);

    Ok( RenderFeature {
        latitude,
        longitude,
        period: period.label,
        period_start: period.start,
        kind: T::KIND,
        normalized_intensity,
        class,
        color: class.color( &cfg.colors).to_string(),
        radius,
        summary: item.summary(ctx),
    })
}

pub fn derive_features<T: Renderable> (items: &[T], ctx: &RenderContext)->Result<Vec<RenderFeature>> {
    items.iter().map( |it| derive_feature( it, ctx)).collect()
}
