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

//! the complete batch run: normalize, clean, assign regions, aggregate, sample and render, plus the region
//! summary branch. Each run is independent, all batch context lives in the returned [`PipelineOutput`]

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info,warn};

use crate::aggregate::{Aggregate, aggregate};
use crate::clean::{BatchStats, CleanOutcome, CleaningReport, clean};
use crate::config::FiremapConfig;
use crate::errors::Result;
use crate::regions::{RegionLookup, assign_regions};
use crate::render::{IntensityRange, RenderContext, RenderFeature, derive_features};
use crate::sampling::{SamplingDecision, sample_by_period};
use crate::schema::{ColumnMapping, RawTable, normalize};
use crate::summary::{RegionSummary, summarize_regions};

#[derive(Debug,Clone,Serialize,Default)]
pub struct PipelineOutput {
    pub report: CleaningReport,
    #[serde(skip_serializing_if = "odin_common::is_none")]
    pub stats: Option<BatchStats>,
    /// all aggregates (before density sampling)
    pub aggregates: Vec<Aggregate>,
    pub sampling: Vec<SamplingDecision>,
    /// the (sampled) aggregate features
    pub features: Vec<RenderFeature>,
    pub regions: BTreeMap<String,RegionSummary>,
}

impl PipelineOutput {
    pub fn is_empty (&self)->bool { self.stats.is_none() }
}

/// run the pipeline with the default column mapping
pub fn run_pipeline (table: &RawTable, config: &FiremapConfig, regions: Option<&dyn RegionLookup>, now: DateTime<Utc>)->Result<PipelineOutput> {
    run_pipeline_with_mapping( table, &ColumnMapping::default(), config, regions, now)
}

pub fn run_pipeline_with_mapping (table: &RawTable, mapping: &ColumnMapping, config: &FiremapConfig, 
                                  regions: Option<&dyn RegionLookup>, now: DateTime<Utc>)->Result<PipelineOutput> {
    config.validate()?;

    let canonical = normalize( table, mapping)?;
    let batch = match clean( &canonical, &config.cleaning, now) {
        CleanOutcome::Data(batch) => batch,
        CleanOutcome::NoData(report) => {
            warn!("no data left after cleaning {} records", report.input_rows);
            return Ok( PipelineOutput { report, ..Default::default() })
        }
    };

    let stats = batch.stats;
    let (records, _) = assign_regions( batch.records, regions);

    let region_summaries = summarize_regions( &records);

    let aggregates = aggregate( &records, &config.aggregation, &config.seasons)?;
    // normalize over all aggregates so that per period sampling does not shift the color scale
    let intensity_range = IntensityRange::of_items( &aggregates).unwrap_or_else( || IntensityRange::of_batch( &stats));
    let (sampled, sampling) = sample_by_period( aggregates.clone(), |a| &a.period, &config.sampling);

    let ctx = RenderContext { 
        config: &config.render, 
        intensity_range, 
        granularity: config.aggregation.granularity, 
        seasons: &config.seasons 
    };
    let features = derive_features( &sampled, &ctx)?;

    info!("{} clean records -> {} aggregates -> {} features in {} periods, {} regions", 
          records.len(), aggregates.len(), features.len(), sampling.len(), region_summaries.len());

    Ok( PipelineOutput {
        report: batch.report,
        stats: Some(stats),
        aggregates,
        sampling,
        features,
        regions: region_summaries
    })
}
