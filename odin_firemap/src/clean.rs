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

//! the validation and cleaning engine. This reduces canonical records to physically plausible, temporally valid
//! [`CleanRecord`]s. Stages are applied in a fixed order, each one operating on the survivors of the previous one:
//!
//!   1. coordinate validation (missing / outside of configured bounds)
//!   2. date validation (unparseable / future)
//!   3. numeric coercion of brightness, scan, track and confidence
//!   4. positivity of brightness, scan and track
//!   5. sequential IQR outlier rejection for brightness, scan and track (in this order)
//!
//! Dropped rows are never errors, they are only counted in the [`CleaningReport`]. Derived fields (fire area,
//! intensity) and the [`BatchStats`] are computed once over the final population

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Serialize,Deserialize};
use strum::Display;
use tracing::{debug,info};
use odin_common::{BoundingBox, MinMaxAvg};
use odin_common::datetime::{Dated, date_range, parse_hhmm, parse_naive_date, parse_utc_datetime};
use odin_common::stats::{self, iqr_fence};

use crate::config::CleaningConfig;
use crate::schema::{CanonicalRecord, CanonicalTable};

pub const UNKNOWN_REGION: &str = "Unknown";

/// the measurements that are subject to positivity and outlier checks, in the order they are checked
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize,Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Brightness,
    Scan,
    Track
}

pub const OUTLIER_COLUMNS: [Measure;3] = [Measure::Brightness, Measure::Scan, Measure::Track];

/// something that has brightness, scan and track values
pub trait Measured {
    fn measure (&self, m: Measure)->f64;
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High
}

impl ConfidenceLevel {
    /// VIIRS style letter codes
    pub fn from_code (s: &str)->Option<ConfidenceLevel> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" => Some(ConfidenceLevel::Low),
            "n" | "nominal" | "medium" => Some(ConfidenceLevel::Medium),
            "h" | "high" => Some(ConfidenceLevel::High),
            _ => None
        }
    }
}

/// a validated fire detection with derived fields
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct CleanRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub datetime: DateTime<Utc>,

    pub brightness: f64,
    pub scan: f64,
    pub track: f64,

    pub confidence: Option<f64>,
    pub confidence_level: Option<ConfidenceLevel>,
    pub fire_radiative_power: Option<f64>,
    pub brightness_t31: Option<f64>,
    pub satellite: Option<String>,
    pub instrument: Option<String>,
    pub day_night: Option<String>,

    /// scan * track (km²)
    pub fire_area: f64,

    /// z-score of brightness with respect to the batch
    pub intensity: f64,

    /// administrative region label (assigned by an external geometry lookup)
    pub region: String,
}

impl Dated for CleanRecord {
    fn date (&self)->DateTime<Utc> { self.datetime }
}

impl Measured for CleanRecord {
    fn measure (&self, m: Measure)->f64 {
        match m {
            Measure::Brightness => self.brightness,
            Measure::Scan => self.scan,
            Measure::Track => self.track,
        }
    }
}

/// outcome of the IQR filter for one column
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct IqrOutcome {
    pub column: Measure,
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    pub removed: usize,
}

/// counts of everything removed during cleaning. This is for observability only
#[derive(Debug,Clone,Default,Serialize,Deserialize,PartialEq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub missing_coordinates: usize,
    pub out_of_bounds: usize,
    pub invalid_dates: usize,
    pub future_dates: usize,
    /// per column count of cells that were present but not numeric
    pub non_numeric: BTreeMap<String,usize>,
    pub missing_measurements: usize,
    pub non_positive: usize,
    pub outliers: Vec<IqrOutcome>,
    pub output_rows: usize,
}

impl CleaningReport {
    pub fn outliers_in (&self, column: Measure)->usize {
        self.outliers.iter().filter(|o| o.column == column).map(|o| o.removed).sum()
    }

    pub fn total_outliers (&self)->usize {
        self.outliers.iter().map(|o| o.removed).sum()
    }

    pub fn total_dropped (&self)->usize {
        self.input_rows - self.output_rows
    }

    fn count_non_numeric (&mut self, column: &str) {
        *self.non_numeric.entry(column.to_string()).or_insert(0) += 1;
    }
}

/// batch level statistics. These are computed exactly once per run from the final cleaned population and are
/// afterwards only passed around as read-only context
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct BatchStats {
    pub count: usize,
    pub brightness_mean: f64,
    /// sample standard deviation, None if there are less than two records
    pub brightness_std: Option<f64>,
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub fire_area_min: f64,
    pub fire_area_max: f64,
    pub first_date: DateTime<Utc>,
    pub last_date: DateTime<Utc>,
}

/// a non-empty cleaning result
#[derive(Debug,Clone)]
pub struct CleanBatch {
    pub records: Vec<CleanRecord>,
    pub report: CleaningReport,
    pub stats: BatchStats,
}

/// the result of cleaning. An empty result is a normal outcome
#[derive(Debug,Clone)]
pub enum CleanOutcome {
    Data(CleanBatch),
    NoData(CleaningReport)
}

impl CleanOutcome {
    pub fn report (&self)->&CleaningReport {
        match self {
            CleanOutcome::Data(batch) => &batch.report,
            CleanOutcome::NoData(report) => report
        }
    }

    pub fn records (&self)->&[CleanRecord] {
        match self {
            CleanOutcome::Data(batch) => &batch.records,
            CleanOutcome::NoData(_) => &[]
        }
    }

    pub fn is_empty (&self)->bool { matches!( self, CleanOutcome::NoData(_)) }

    pub fn into_batch (self)->Option<CleanBatch> {
        match self {
            CleanOutcome::Data(batch) => Some(batch),
            CleanOutcome::NoData(_) => None
        }
    }
}

/* #region stage types ***********************************************************************************/

struct Located<'a> {
    src: &'a CanonicalRecord,
    lat: f64,
    lon: f64,
}

struct Timed<'a> {
    loc: Located<'a>,
    datetime: DateTime<Utc>,
}

struct Coerced<'a> {
    dated: Timed<'a>,
    brightness: Option<f64>,
    scan: Option<f64>,
    track: Option<f64>,
    confidence: Option<f64>,
    fire_radiative_power: Option<f64>,
    brightness_t31: Option<f64>,
}

/// a row that passed all per-row checks
struct Candidate<'a> {
    coerced: Coerced<'a>,
    brightness: f64,
    scan: f64,
    track: f64,
}

impl<'a> Measured for Candidate<'a> {
    fn measure (&self, m: Measure)->f64 {
        match m {
            Measure::Brightness => self.brightness,
            Measure::Scan => self.scan,
            Measure::Track => self.track,
        }
    }
}

/* #endregion stage types */

/// run all cleaning stages on the given canonical table.
/// `now` is the processing time against which future dates are checked
pub fn clean (table: &CanonicalTable, config: &CleaningConfig, now: DateTime<Utc>)->CleanOutcome {
    let mut report = CleaningReport { input_rows: table.len(), ..Default::default() };

    let located = validate_coordinates( &table.records, &config.bounds, &mut report);
    let dated = validate_dates( located, now, &mut report);
    let coerced = coerce_numerics( dated, &mut report);
    let positive = check_positive( coerced, &mut report);

    let (survivors, outcomes) = reject_outliers( positive, config.iqr_factor);
    for o in &outcomes {
        debug!("IQR {}: q1={} q3={} range=[{},{}] removed {}", o.column, o.q1, o.q3, o.lower, o.upper, o.removed);
    }
    report.outliers = outcomes;
    report.output_rows = survivors.len();

    info!("cleaned {} of {} records (coords: -{}/-{}, dates: -{}/-{}, measurements: -{}/-{}, outliers: -{})",
          report.output_rows, report.input_rows, 
          report.missing_coordinates, report.out_of_bounds, 
          report.invalid_dates, report.future_dates,
          report.missing_measurements, report.non_positive, 
          report.total_outliers());

    match derive_records( survivors) {
        Some((records,stats)) => CleanOutcome::Data( CleanBatch { records, report, stats } ),
        None => CleanOutcome::NoData(report)
    }
}

fn validate_coordinates<'a> (records: &'a [CanonicalRecord], bounds: &BoundingBox<f64>, report: &mut CleaningReport)->Vec<Located<'a>> {
    let mut located = Vec::with_capacity(records.len());

    for src in records {
        match (parse_finite(src.latitude.as_deref()), parse_finite(src.longitude.as_deref())) {
            (Some(lat), Some(lon)) => {
                if bounds.contains(lon, lat) && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                    located.push( Located { src, lat, lon } );
                } else {
                    report.out_of_bounds += 1;
                }
            }
            _ => report.missing_coordinates += 1
        }
    }

    debug!("coordinate validation: {} -> {}", records.len(), located.len());
    located
}

fn validate_dates<'a> (located: Vec<Located<'a>>, now: DateTime<Utc>, report: &mut CleaningReport)->Vec<Timed<'a>> {
    let n = located.len();
    let mut dated = Vec::with_capacity(n);

    for loc in located {
        match parse_acquisition_datetime( loc.src.date.as_deref(), loc.src.time.as_deref()) {
            Some(datetime) if datetime <= now => dated.push( Timed { loc, datetime } ),
            Some(_) => report.future_dates += 1,
            None => report.invalid_dates += 1
        }
    }

    debug!("date validation: {} -> {}", n, dated.len());
    dated
}

/// combine acquisition date and optional HHMM time of day. A date with a time cell has to be a plain calendar date
pub fn parse_acquisition_datetime (date: Option<&str>, time: Option<&str>)->Option<DateTime<Utc>> {
    let date = date?;
    match time {
        Some(time) => {
            let nd = parse_naive_date(date)?;
            let nt = parse_hhmm(time)?;
            Some( nd.and_time(nt).and_utc() )
        }
        None => parse_utc_datetime(date)
    }
}

fn coerce_numerics<'a> (dated: Vec<Timed<'a>>, report: &mut CleaningReport)->Vec<Coerced<'a>> {
    dated.into_iter().map( |dated| {
        let src = dated.loc.src;
        let brightness = coerce( src.brightness.as_deref(), "brightness", report);
        let scan = coerce( src.scan.as_deref(), "scan", report);
        let track = coerce( src.track.as_deref(), "track", report);
        let fire_radiative_power = coerce( src.fire_radiative_power.as_deref(), "fire_radiative_power", report);
        let brightness_t31 = coerce( src.brightness_t31.as_deref(), "brightness_t31", report);

        // letter codes are valid confidence values, they just don't have a numeric value
        let confidence = match src.confidence.as_deref() {
            Some(s) if ConfidenceLevel::from_code(s).is_some() => None,
            other => coerce( other, "confidence", report)
        };

        Coerced { dated, brightness, scan, track, confidence, fire_radiative_power, brightness_t31 }
    }).collect()
}

fn check_positive<'a> (coerced: Vec<Coerced<'a>>, report: &mut CleaningReport)->Vec<Candidate<'a>> {
    let n = coerced.len();
    let mut candidates = Vec::with_capacity(n);

    for c in coerced {
        match (c.brightness, c.scan, c.track) {
            (Some(brightness), Some(scan), Some(track)) => {
                if brightness > 0.0 && scan > 0.0 && track > 0.0 {
                    candidates.push( Candidate { coerced: c, brightness, scan, track } );
                } else {
                    report.non_positive += 1;
                }
            }
            _ => report.missing_measurements += 1
        }
    }

    debug!("positivity check: {} -> {}", n, candidates.len());
    candidates
}

/// sequential IQR outlier rejection over brightness, scan and track (in this order). The quantiles of each column
/// are computed over the population that survived the previous columns.
/// Returns the survivors (in input order) and the per-column outcomes
pub fn reject_outliers<T: Measured> (mut rows: Vec<T>, k: f64)->(Vec<T>,Vec<IqrOutcome>) {
    let mut outcomes = Vec::with_capacity(OUTLIER_COLUMNS.len());

    for column in OUTLIER_COLUMNS {
        let values: Vec<f64> = rows.iter().map(|r| r.measure(column)).collect();
        if let Some(fence) = iqr_fence( &values, k) {
            let n = rows.len();
            rows.retain( |r| fence.admits( r.measure(column)));
            outcomes.push( IqrOutcome { column, q1: fence.q1, q3: fence.q3, lower: fence.lower, upper: fence.upper, removed: n - rows.len() });
        }
    }

    (rows, outcomes)
}

fn derive_records (candidates: Vec<Candidate>)->Option<(Vec<CleanRecord>,BatchStats)> {
    if candidates.is_empty() { return None }

    let brightness: Vec<f64> = candidates.iter().map(|c| c.brightness).collect();
    let brightness_mean = stats::mean(&brightness)?;
    let brightness_std = stats::std_dev(&brightness);
    let z_scale = brightness_std.filter(|s| *s > 0.0);

    let numeric_confidences: Vec<f64> = candidates.iter().filter_map(|c| c.coerced.confidence).collect();
    let tertiles = confidence_tertiles(&numeric_confidences);

    let mut records: Vec<CleanRecord> = candidates.into_iter().map( |c| {
        let src = c.coerced.dated.loc.src;
        let confidence = c.coerced.confidence;
        let confidence_level = match confidence {
            Some(v) => tertiles.map(|(t1,t2)| if v <= t1 { ConfidenceLevel::Low } else if v <= t2 { ConfidenceLevel::Medium } else { ConfidenceLevel::High }),
            None => src.confidence.as_deref().and_then(ConfidenceLevel::from_code)
        };
        let intensity = match z_scale {
            Some(std) => (c.brightness - brightness_mean) / std,
            None => 0.0
        };

        CleanRecord {
            latitude: c.coerced.dated.loc.lat,
            longitude: c.coerced.dated.loc.lon,
            datetime: c.coerced.dated.datetime,
            brightness: c.brightness,
            scan: c.scan,
            track: c.track,
            confidence,
            confidence_level,
            fire_radiative_power: c.coerced.fire_radiative_power,
            brightness_t31: c.coerced.brightness_t31,
            satellite: src.satellite.clone(),
            instrument: src.instrument.clone(),
            day_night: src.day_night.clone(),
            fire_area: c.scan * c.track,
            intensity,
            region: UNKNOWN_REGION.to_string(),
        }
    }).collect();

    records.sort_by_key( |r| r.datetime); // stable

    let intensity = MinMaxAvg::from_values( records.iter().map(|r| &r.intensity));
    let fire_area = MinMaxAvg::from_values( records.iter().map(|r| &r.fire_area));
    let (first_date, last_date) = date_range( records.iter())?;

    let stats = BatchStats {
        count: records.len(),
        brightness_mean,
        brightness_std,
        intensity_min: intensity.min,
        intensity_max: intensity.max,
        fire_area_min: fire_area.min,
        fire_area_max: fire_area.max,
        first_date,
        last_date
    };

    Some( (records, stats) )
}

/// the 1/3 and 2/3 quantiles of numeric confidence values
fn confidence_tertiles (values: &[f64])->Option<(f64,f64)> {
    let sorted = stats::sorted(values);
    let t1 = stats::quantile_sorted(&sorted, 1.0/3.0)?;
    let t2 = stats::quantile_sorted(&sorted, 2.0/3.0)?;
    Some((t1,t2))
}

/// parse a finite number from an optional cell. Missing and non-numeric both yield None
fn parse_finite (s: Option<&str>)->Option<f64> {
    s.and_then(|s| s.trim().parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// numeric coercion that counts present but non-numeric cells
fn coerce (s: Option<&str>, column: &str, report: &mut CleaningReport)->Option<f64> {
    let s = s?;
    let v = parse_finite(Some(s));
    if v.is_none() { report.count_non_numeric(column) }
    v
}
