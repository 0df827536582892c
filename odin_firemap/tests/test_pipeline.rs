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

use std::io::Write;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use odin_firemap::{CleanRecord, FiremapConfig, OdinFiremapError, load_config, run_pipeline};
use odin_firemap::config::IntensityNormalization;
use odin_firemap::output::to_feature_collection;
use odin_firemap::period::Granularity;
use odin_firemap::regions::{PolygonRegions, RegionLookup, assign_regions};
use odin_firemap::render::IntensityClass;
use odin_firemap::schema::RawTable;
use odin_firemap::summary::summarize_regions;

const HEADER: [&str;8] = ["Latitude", "Longitude", "Brightness", "Scan", "Track", "Acq_Date", "Acq_Time", "FRP"];

fn now()->DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
}

fn input_table()->RawTable {
    RawTable::from_strs( &HEADER, &[
        &["37.12", "-120.04", "310.0", "1.0", "1.0", "2023-07-01", "0130", "10.0"],
        &["37.14", "-120.01", "330.0", "1.2", "1.1", "2023-07-02", "1345", "20.0"],
        &["37.08", "-119.96", "320.0", "1.1", "1.0", "2023-07-03", "0950", ""],
        &["45.51", "-110.30", "305.0", "1.0", "1.0", "2023-08-03", "2210", "5.0"],
        &["37.12", "-120.04", "300.0", "1.0", "1.2", "2024-01-05", "0800", "8.0"],
        &["95.00", "-120.04", "300.0", "1.0", "1.0", "2024-01-05", "0800", ""],  // out of bounds
        &["37.12", "-120.04", "300.0", "1.0", "1.0", "2024-02-05", "0800", ""],  // future
    ]).unwrap()
}

fn west_of_115 (lat: f64, lon: f64)->odin_firemap::Result<Option<String>> {
    Ok( if lon < -115.0 { Some("CA".to_string()) } else { None })
}

#[test]
fn test_pipeline_run()->Result<()> {
    let config = FiremapConfig::default();
    let regions = west_of_115;
    let output = run_pipeline( &input_table(), &config, Some(&regions as &dyn RegionLookup), now())?;

    println!("{}", serde_json::to_string_pretty(&output)?);

    assert_eq!( output.report.input_rows, 7);
    assert_eq!( output.report.out_of_bounds, 1);
    assert_eq!( output.report.future_dates, 1);
    assert_eq!( output.report.output_rows, 5);

    let stats = output.stats.as_ref().unwrap();
    assert_eq!( stats.count, 5);

    // seasonal aggregation with spatial bins
    let labels: Vec<&str> = output.aggregates.iter().map(|a| a.period.label.as_str()).collect();
    assert_eq!( labels, vec!["2023-Summer", "2023-Summer", "2023-Winter"]);
    assert_eq!( output.aggregates[0].count, 3);
    assert_eq!( output.aggregates[0].frp_sum, Some(30.0));

    assert_eq!( output.features.len(), 3); // nothing to sample
    for f in &output.features {
        assert!( (0.0..=1.0).contains(&f.normalized_intensity));
        assert!( f.radius >= config.render.min_radius && f.radius <= config.render.max_radius);
    }

    let ca = output.regions.get("CA").unwrap();
    assert_eq!( ca.count, 4);
    let unknown = output.regions.get("Unknown").unwrap();
    assert_eq!( unknown.count, 1);
    Ok(())
}

#[test]
fn test_pipeline_reproducible()->Result<()> {
    let mut config = FiremapConfig::default();
    config.aggregation.granularity = Granularity::Monthly;
    config.render.normalization = IntensityNormalization::SigmaClip(2.0);

    let a = run_pipeline( &input_table(), &config, None, now())?;
    let b = run_pipeline( &input_table(), &config, None, now())?;
    assert_eq!( a.features, b.features);
    assert_eq!( a.aggregates, b.aggregates);
    assert!( a.regions.keys().all(|k| k == "Unknown"));
    Ok(())
}

#[test]
fn test_empty_pipeline()->Result<()> {
    let table = RawTable::from_strs( &HEADER, &[ &["95.0", "-120.0", "310.0", "1.0", "1.0", "2023-07-01", "0130", ""] ])?;
    let output = run_pipeline( &table, &FiremapConfig::default(), None, now())?;
    assert!( output.is_empty());
    assert!( output.features.is_empty() && output.aggregates.is_empty() && output.regions.is_empty());
    assert_eq!( output.report.out_of_bounds, 1);
    Ok(())
}

#[test]
fn test_malformed_input_fails() {
    let table = RawTable::from_strs( &["lat", "lon"], &[ &["37.0", "-120.0"] ]).unwrap();
    let res = run_pipeline( &table, &FiremapConfig::default(), None, now());
    assert!( matches!( res, Err(OdinFiremapError::MissingColumns(_))));
}

#[test]
fn test_failing_region_lookup_degrades()->Result<()> {
    let failing = |_lat: f64, _lon: f64| -> odin_firemap::Result<Option<String>> {
        Err( OdinFiremapError::OpFailed("geometry service unavailable".to_string()))
    };
    let output = run_pipeline( &input_table(), &FiremapConfig::default(), Some(&failing as &dyn RegionLookup), now())?;
    assert_eq!( output.regions.len(), 1);
    assert_eq!( output.regions.get("Unknown").map(|s| s.count), Some(5));
    assert!( output.aggregates.iter().all(|a| a.region == "Unknown"));
    Ok(())
}

fn ca_record (fire_area: f64)->CleanRecord {
    CleanRecord {
        latitude: 37.0,
        longitude: -120.0,
        datetime: now(),
        brightness: 310.0,
        scan: fire_area,
        track: 1.0,
        confidence: None,
        confidence_level: None,
        fire_radiative_power: None,
        brightness_t31: None,
        satellite: None,
        instrument: None,
        day_night: None,
        fire_area,
        intensity: 0.0,
        region: "CA".to_string(),
    }
}

#[test]
fn test_region_summary() {
    let summary = summarize_regions( &[ca_record(2.0), ca_record(3.0)]);
    println!("{:?}", summary);
    assert_eq!( summary.len(), 1);
    let ca = summary.get("CA").unwrap();
    assert_eq!( ca.total_area, 5.0);
    assert_eq!( ca.count, 2);
}

const REGIONS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "id": "CA", "properties": { "name": "California" },
      "geometry": { "type": "Polygon", "coordinates": [[[-124.0,32.0],[-114.0,32.0],[-114.0,42.0],[-124.0,42.0],[-124.0,32.0]]] } },
    { "type": "Feature", "id": "NV", "properties": { "name": "Nevada" },
      "geometry": { "type": "Polygon", "coordinates": [[[-114.0,35.0],[-110.0,35.0],[-110.0,42.0],[-114.0,42.0],[-114.0,35.0]]] } }
  ]
}"#;

#[test]
fn test_polygon_regions()->Result<()> {
    let regions = PolygonRegions::from_geojson_str( REGIONS, None)?;
    assert_eq!( regions.len(), 2);
    assert_eq!( regions.region_of( 37.0, -120.0)?, Some("CA".to_string()));
    assert_eq!( regions.region_of( 37.0, -112.0)?, Some("NV".to_string()));
    assert_eq!( regions.region_of( 37.0, -114.0)?, Some("CA".to_string())); // shared boundary, first wins
    assert_eq!( regions.region_of( 50.0, -120.0)?, None);

    let named = PolygonRegions::from_geojson_str( REGIONS, Some("name"))?;
    assert_eq!( named.region_of( 37.0, -112.0)?, Some("Nevada".to_string()));

    let labels: Vec<&str> = named.labels().collect();
    assert_eq!( labels, vec!["California", "Nevada"]);

    let mut outside = ca_record(1.0);
    outside.latitude = 50.0;
    let (records, n) = assign_regions( vec![ca_record(1.0), outside], Some(&regions));
    assert_eq!( n, 1);
    assert_eq!( records.len(), 2);
    assert_eq!( records[0].region, "CA");
    assert_eq!( records[1].region, "Unknown");
    assert_eq!( records[1].latitude, 50.0);

    let (records, n) = assign_regions( records, None);
    assert_eq!( n, 0);
    assert!( records.iter().all( |r| r.region == "Unknown"));
    Ok(())
}

#[test]
fn test_aggregate_normalization_range()->Result<()> {
    // two bins whose mean intensities are much closer than the extreme records
    let table = RawTable::from_strs( &HEADER, &[
        &["37.01", "-120.01", "300.0", "1.0", "1.0", "2023-07-01", "0130", ""],
        &["37.02", "-120.02", "330.0", "1.0", "1.0", "2023-07-02", "0130", ""],
        &["38.01", "-121.01", "310.0", "1.0", "1.0", "2023-07-03", "0130", ""],
        &["38.02", "-121.02", "340.0", "1.0", "1.0", "2023-07-04", "0130", ""],
    ])?;
    let output = run_pipeline( &table, &FiremapConfig::default(), None, now())?;

    assert_eq!( output.aggregates.len(), 2);
    assert_eq!( output.features.len(), 2);
    for f in &output.features {
        println!("{} {}: {} -> {}", f.latitude, f.longitude, f.normalized_intensity, f.class);
    }

    let hottest = output.features.iter().find( |f| f.latitude > 38.0).unwrap();
    let coolest = output.features.iter().find( |f| f.latitude < 38.0).unwrap();
    assert_eq!( hottest.normalized_intensity, 1.0);
    assert_eq!( hottest.class, IntensityClass::High);
    assert_eq!( coolest.normalized_intensity, 0.0);
    assert_eq!( coolest.class, IntensityClass::Low);
    Ok(())
}

#[test]
fn test_geojson_output()->Result<()> {
    let output = run_pipeline( &input_table(), &FiremapConfig::default(), None, now())?;
    let fc = to_feature_collection( &output.features)?;
    assert_eq!( fc.features.len(), output.features.len());

    let json = serde_json::to_value( &fc)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    assert_eq!( json["type"], "FeatureCollection");
    let f0 = &json["features"][0];
    assert_eq!( f0["geometry"]["type"], "Point");
    assert_eq!( f0["properties"]["period"], "2023-Summer");
    assert!( f0["properties"].get("latitude").is_none());
    Ok(())
}

#[test]
fn test_load_config()->Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!( file, r#"
    FiremapConfig(
        cleaning: ( bounds: ( west: -125.0, south: 32.0, east: -114.0, north: 42.0 ) ),
        aggregation: ( granularity: Monthly ),
        sampling: ( max_per_period: 500, seed: 7 ),
        render: ( normalization: SigmaClip(2.0) ),
    )
    "#)?;

    let config = load_config( file.path())?;
    println!("{:#?}", config);
    assert_eq!( config.cleaning.bounds.west, -125.0);
    assert_eq!( config.cleaning.iqr_factor, 1.5); // default
    assert_eq!( config.aggregation.granularity, Granularity::Monthly);
    assert_eq!( config.aggregation.bin_precision, 1);
    assert_eq!( config.sampling.max_per_period, 500);
    assert_eq!( config.sampling.sample_fraction, 0.2);
    assert_eq!( config.render.normalization, IntensityNormalization::SigmaClip(2.0));
    assert_eq!( config.render.max_radius, 20.0);
    assert_eq!( config.seasons.seasons().len(), 4);
    Ok(())
}

#[test]
fn test_invalid_config() -> Result<()> {
    assert!( FiremapConfig::default().validate().is_ok());

    let mut file = tempfile::NamedTempFile::new()?;
    write!( file, "FiremapConfig( sampling: ( sample_fraction: 1.5 ) )")?;
    assert!( matches!( load_config( file.path()), Err(OdinFiremapError::ConfigError(_))));

    let mut file = tempfile::NamedTempFile::new()?;
    write!( file, "FiremapConfig( sampling: ( sample_fraction: ")?;
    assert!( matches!( load_config( file.path()), Err(OdinFiremapError::ConfigParseError(_))));
    Ok(())
}

#[test]
fn test_shipped_config()->Result<()> {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/config/firemap.ron");
    let config = load_config( path)?;
    assert_eq!( config, FiremapConfig::default());
    Ok(())
}
