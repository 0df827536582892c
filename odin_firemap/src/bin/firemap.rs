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

use std::{fs::File, io::{self, Write}, path::PathBuf};
use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use odin_common::datetime::utc_now;
use odin_firemap::{FiremapConfig, load_config, run_pipeline};
use odin_firemap::output::to_feature_collection;
use odin_firemap::period::Granularity;
use odin_firemap::regions::{PolygonRegions, RegionLookup};
use odin_firemap::schema::RawTable;

#[derive(Parser, Debug)]
#[command(version, about, long_about = "process fire detection CSV archives into fire map features")]
pub struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// GeoJSON FeatureCollection with region polygons
    #[arg(short,long)]
    pub regions: Option<PathBuf>,

    /// region feature property to use as label (feature id if not set)
    #[arg(long)]
    pub region_property: Option<String>,

    /// output file (stdout if not set)
    #[arg(short,long)]
    pub output: Option<PathBuf>,

    /// override configured aggregation granularity (yearly, monthly, weekly, seasonal)
    #[arg(short,long)]
    pub granularity: Option<Granularity>,

    /// override configured sampling seed
    #[arg(short,long)]
    pub seed: Option<u64>,

    /// write features as GeoJSON FeatureCollection instead of the full pipeline output
    #[arg(long)]
    pub geojson: bool,

    /// CSV input files, which all need to have the same header
    #[arg(num_args=1.., required=true)]
    pub inputs: Vec<PathBuf>,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))  // use RUST_LOG to override
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FiremapConfig::default()
    };
    if let Some(granularity) = args.granularity { config.aggregation.granularity = granularity }
    if let Some(seed) = args.seed { config.sampling.seed = seed }

    let regions = match &args.regions {
        Some(path) => Some( PolygonRegions::from_path( path, args.region_property.as_deref())?),
        None => None
    };

    let mut table = RawTable::default();
    for path in &args.inputs {
        info!("reading {:?}", path);
        table.append( RawTable::from_csv_path(path)?)?;
    }
    if table.is_empty() {
        bail!("no input records");
    }

    let output = run_pipeline( &table, &config, regions.as_ref().map(|r| r as &dyn RegionLookup), utc_now())?;

    let json = if args.geojson {
        serde_json::to_string_pretty( &to_feature_collection( &output.features)?)?
    } else {
        serde_json::to_string_pretty( &output)?
    };

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all( json.as_bytes())?;
            info!("wrote {} features to {:?}", output.features.len(), path);
        }
        None => println!("{json}")
    }

    Ok(())
}
