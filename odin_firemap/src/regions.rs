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

//! administrative region assignment. Region geometry is an external concern, the pipeline only sees it through
//! the [`RegionLookup`] trait. [`PolygonRegions`] is a simple lookup over named GeoJSON polygons

use std::{fs, path::Path};
use geo::{BoundingRect, Intersects, Point, Rect};
use geojson::{GeoJson, feature::Id};
use tracing::{debug,warn};

use crate::clean::{CleanRecord, UNKNOWN_REGION};
use crate::errors::{Result, OdinFiremapError, op_failed};

/// the geometry collaborator that maps a location to an administrative region label.
/// `Ok(None)` means the location is not inside of any known region
pub trait RegionLookup {
    fn region_of (&self, lat: f64, lon: f64)->Result<Option<String>>;
}

impl<F> RegionLookup for F where F: Fn(f64,f64)->Result<Option<String>> {
    fn region_of (&self, lat: f64, lon: f64)->Result<Option<String>> {
        self(lat,lon)
    }
}

/// consume the clean records and return them labeled with their region, together with the number of records
/// in a known region. Records outside of known regions get "Unknown". If there is no lookup or it fails all
/// records are labeled "Unknown", which is not an error for the pipeline
pub fn assign_regions (records: Vec<CleanRecord>, lookup: Option<&dyn RegionLookup>)->(Vec<CleanRecord>,usize) {
    let Some(lookup) = lookup else {
        debug!("no region lookup, all records are {}", UNKNOWN_REGION);
        return (all_unknown(records), 0)
    };

    let mut labels: Vec<Option<String>> = Vec::with_capacity(records.len());
    for r in &records {
        match lookup.region_of( r.latitude, r.longitude) {
            Ok(label) => labels.push(label),
            Err(e) => {
                warn!("region lookup failed at ({},{}): {}, all records are {}", r.latitude, r.longitude, e, UNKNOWN_REGION);
                return (all_unknown(records), 0)
            }
        }
    }

    let n_records = records.len();
    let mut n_known = 0;
    let labeled: Vec<CleanRecord> = records.into_iter().zip( labels.into_iter()).map( |(r,label)| {
        let region = match label {
            Some(label) => { n_known += 1; label }
            None => UNKNOWN_REGION.to_string()
        };
        CleanRecord { region, ..r }
    }).collect();

    debug!("{} of {} records assigned to known regions", n_known, n_records);
    (labeled, n_known)
}

fn all_unknown (records: Vec<CleanRecord>)->Vec<CleanRecord> {
    records.into_iter().map( |r| CleanRecord { region: UNKNOWN_REGION.to_string(), ..r }).collect()
}

struct NamedRegion {
    label: String,
    geometry: geo_types::Geometry<f64>,
    bbox: Option<Rect<f64>>,
}

/// region lookup over a GeoJSON FeatureCollection of (multi)polygons. The label of a feature is either the value of
/// a configured property or (if there is none) its id. Points on region boundaries are inside, the first matching
/// feature wins
pub struct PolygonRegions {
    regions: Vec<NamedRegion>
}

impl PolygonRegions {
    pub fn from_geojson_str (s: &str, label_property: Option<&str>)->Result<Self> {
        let fc = match s.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc,
            _ => return Err( OdinFiremapError::GeoJsonError("region source is not a FeatureCollection".to_string()))
        };

        let mut regions = Vec::with_capacity( fc.features.len());
        for (i,feature) in fc.features.into_iter().enumerate() {
            let prop_label = label_property.and_then( |p| feature.property(p)).and_then( |v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None
            });
            let label = prop_label.or_else( || match &feature.id {
                Some(Id::String(s)) => Some(s.clone()),
                Some(Id::Number(n)) => Some(n.to_string()),
                None => None
            });
            let Some(label) = label else {
                warn!("ignoring region feature {} without label", i);
                continue
            };
            let Some(geometry) = feature.geometry else {
                warn!("ignoring region feature {} without geometry", label);
                continue
            };

            let geometry = geo_types::Geometry::<f64>::try_from( geometry)?;
            match geometry {
                geo_types::Geometry::Polygon(_) | geo_types::Geometry::MultiPolygon(_) => {
                    let bbox = geometry.bounding_rect();
                    regions.push( NamedRegion { label, geometry, bbox });
                }
                _ => warn!("ignoring non-polygon region feature {}", label)
            }
        }

        if regions.is_empty() {
            return Err( op_failed!("no usable region polygons"))
        }
        debug!("loaded {} region polygons", regions.len());
        Ok( PolygonRegions { regions } )
    }

    pub fn from_path (path: impl AsRef<Path>, label_property: Option<&str>)->Result<Self> {
        let s = fs::read_to_string( path.as_ref())?;
        Self::from_geojson_str( &s, label_property)
    }

    pub fn len (&self)->usize { self.regions.len() }

    pub fn labels (&self)->impl Iterator<Item=&str> {
        self.regions.iter().map( |r| r.label.as_str())
    }
}

impl RegionLookup for PolygonRegions {
    fn region_of (&self, lat: f64, lon: f64)->Result<Option<String>> {
        let p = Point::new(lon, lat);
        let label = self.regions.iter()
            .filter( |r| r.bbox.is_none_or( |bb| bb.intersects(&p)))
            .find( |r| r.geometry.intersects(&p))
            .map( |r| r.label.clone());
        Ok(label)
    }
}
