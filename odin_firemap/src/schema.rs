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

//! raw tabular input and its normalization into canonical fire records.
//! Different archives (FIRMS MODIS/VIIRS CSV, shapefile attribute tables, API exports) use different names
//! and cases for the same fields. The [`ColumnMapping`] maps all known variants to [`CanonicalField`]s

use std::{collections::{BTreeMap,HashMap}, fs::File, io, path::Path};
use lazy_static::lazy_static;
use serde::{Serialize,Deserialize};
use strum::{AsRefStr,Display,EnumIter,IntoEnumIterator};
use tracing::debug;

use crate::errors::{OdinFiremapError, Result, malformed_input};

/// one row of source data, in source column order
pub type RawRecord = Vec<String>;

/// source data as a header and rows of (untyped) cells
#[derive(Debug,Clone,Default,PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn new (header: Vec<String>)->Self {
        RawTable { header, rows: Vec::new() }
    }

    pub fn from_rows (header: Vec<String>, rows: Vec<RawRecord>)->Result<Self> {
        let mut table = RawTable::new(header);
        for row in rows { table.push(row)? }
        Ok(table)
    }

    /// convenience ctor for literal tables (mostly for tests)
    pub fn from_strs (header: &[&str], rows: &[&[&str]])->Result<Self> {
        let header = header.iter().map(|s| s.to_string()).collect();
        let rows = rows.iter().map( |r| r.iter().map(|s| s.to_string()).collect()).collect();
        Self::from_rows(header, rows)
    }

    pub fn push (&mut self, row: RawRecord)->Result<()> {
        if row.len() != self.header.len() {
            return Err( malformed_input!("row {} has {} cells, header has {}", self.rows.len()+1, row.len(), self.header.len()))
        }
        self.rows.push(row);
        Ok(())
    }

    /// append the rows of another table with the same header
    pub fn append (&mut self, other: RawTable)->Result<()> {
        if self.header.is_empty() && self.rows.is_empty() {
            *self = other;
            Ok(())
        } else if self.header == other.header {
            self.rows.extend( other.rows);
            Ok(())
        } else {
            Err( malformed_input!("incompatible headers {:?} and {:?}", self.header, other.header))
        }
    }

    pub fn len (&self)->usize { self.rows.len() }
    pub fn is_empty (&self)->bool { self.rows.is_empty() }

    /// read a CSV source with header line. Rows with a different number of cells than the header make the
    /// whole input malformed
    pub fn from_csv_reader (reader: impl io::Read)->Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
        let header: Vec<String> = csv_reader.headers()?.iter().map( |s| s.to_string()).collect();
        if header.is_empty() {
            return Err( malformed_input!("no header"))
        }

        let mut table = RawTable::new(header);
        for res in csv_reader.records() {
            let rec = res?;
            table.push( rec.iter().map(|s| s.to_string()).collect())?;
        }
        debug!("read {} CSV rows with {} columns", table.len(), table.header.len());
        Ok(table)
    }

    pub fn from_csv_path (path: impl AsRef<Path>)->Result<Self> {
        let file = File::open( path.as_ref())?;
        Self::from_csv_reader(file)
    }
}

/// the fields of a canonical fire record. The string representation is the canonical column name
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize,Display,AsRefStr,EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Latitude,
    Longitude,
    Brightness,
    Scan,
    Track,
    Date,
    Time,
    Confidence,
    Satellite,
    Instrument,
    Version,
    #[strum(serialize = "brightness_t31")]
    #[serde(rename = "brightness_t31")]
    BrightnessT31,
    FireRadiativePower,
    DayNight,
}

impl CanonicalField {
    pub fn is_mandatory (&self)->bool {
        use CanonicalField::*;
        matches!( self, Latitude | Longitude | Brightness | Scan | Track | Date)
    }

    pub fn mandatory_fields ()->impl Iterator<Item=CanonicalField> {
        CanonicalField::iter().filter( |f| f.is_mandatory())
    }
}

lazy_static! {
    // source name variants (lower case) of NASA FIRMS / shapefile / API exports
    static ref DEFAULT_ALIASES: Vec<(&'static str, CanonicalField)> = {
        use CanonicalField::*;
        vec![
            ("latitude", Latitude), ("lat", Latitude),
            ("longitude", Longitude), ("lon", Longitude), ("long", Longitude),
            ("brightness", Brightness), ("bright_ti4", Brightness),
            ("scan", Scan),
            ("track", Track),
            ("acq_date", Date), ("date", Date),
            ("acq_time", Time), ("time", Time),
            ("confidence", Confidence),
            ("satellite", Satellite),
            ("instrument", Instrument),
            ("version", Version),
            ("bright_t31", BrightnessT31), ("bright_ti5", BrightnessT31), ("brightness_t31", BrightnessT31),
            ("frp", FireRadiativePower), ("fire_radiative_power", FireRadiativePower),
            ("daynight", DayNight), ("day_night", DayNight),
        ]
    };
}

/// case insensitive mapping from source column name variants to canonical fields
#[derive(Debug,Clone)]
pub struct ColumnMapping {
    aliases: HashMap<String,CanonicalField>
}

impl Default for ColumnMapping {
    fn default()->Self {
        let aliases = DEFAULT_ALIASES.iter().map( |(a,f)| (a.to_string(), *f)).collect();
        ColumnMapping { aliases }
    }
}

impl ColumnMapping {
    /// an empty mapping - only useful if all aliases are added explicitly
    pub fn empty ()->Self { ColumnMapping { aliases: HashMap::new() } }

    pub fn with_alias (mut self, alias: &str, field: CanonicalField)->Self {
        self.aliases.insert( alias.trim().to_lowercase(), field);
        self
    }

    pub fn resolve (&self, column: &str)->Option<CanonicalField> {
        self.aliases.get( &column.trim().to_lowercase()).copied()
    }
}

/// a source record with canonical field names. Values are still untyped source cells (typing and unit
/// coercion is part of cleaning), empty cells are `None`. Columns without canonical mapping are kept in `extra`
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct CanonicalRecord {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub brightness: Option<String>,
    pub scan: Option<String>,
    pub track: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub confidence: Option<String>,
    pub satellite: Option<String>,
    pub instrument: Option<String>,
    pub version: Option<String>,
    pub brightness_t31: Option<String>,
    pub fire_radiative_power: Option<String>,
    pub day_night: Option<String>,
    pub extra: BTreeMap<String,String>,
}

impl CanonicalRecord {
    fn slot (&mut self, field: CanonicalField)->&mut Option<String> {
        use CanonicalField::*;
        match field {
            Latitude => &mut self.latitude,
            Longitude => &mut self.longitude,
            Brightness => &mut self.brightness,
            Scan => &mut self.scan,
            Track => &mut self.track,
            Date => &mut self.date,
            Time => &mut self.time,
            Confidence => &mut self.confidence,
            Satellite => &mut self.satellite,
            Instrument => &mut self.instrument,
            Version => &mut self.version,
            BrightnessT31 => &mut self.brightness_t31,
            FireRadiativePower => &mut self.fire_radiative_power,
            DayNight => &mut self.day_night,
        }
    }

    pub fn get (&self, field: CanonicalField)->Option<&str> {
        use CanonicalField::*;
        let v = match field {
            Latitude => &self.latitude,
            Longitude => &self.longitude,
            Brightness => &self.brightness,
            Scan => &self.scan,
            Track => &self.track,
            Date => &self.date,
            Time => &self.time,
            Confidence => &self.confidence,
            Satellite => &self.satellite,
            Instrument => &self.instrument,
            Version => &self.version,
            BrightnessT31 => &self.brightness_t31,
            FireRadiativePower => &self.fire_radiative_power,
            DayNight => &self.day_night,
        };
        v.as_deref()
    }

    pub fn set (&mut self, field: CanonicalField, value: &str) {
        let v = value.trim();
        *self.slot(field) = if v.is_empty() { None } else { Some(v.to_string()) };
    }
}

/// canonical records together with the renamed column list
#[derive(Debug,Clone,Default)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn len (&self)->usize { self.records.len() }
    pub fn is_empty (&self)->bool { self.records.is_empty() }
}

/// rename the columns of a raw table to canonical names. This is a pure rename: no row is dropped or changed.
/// If several source columns map to the same canonical field the first one wins and the others are passed
/// through under their source name.
/// Fails if the input is not rectangular or if any of the mandatory fields is missing after normalization
pub fn normalize (table: &RawTable, mapping: &ColumnMapping)->Result<CanonicalTable> {
    if table.header.is_empty() {
        return Err( malformed_input!("table has no columns"))
    }

    let mut slots: Vec<Option<CanonicalField>> = Vec::with_capacity(table.header.len());
    let mut columns: Vec<String> = Vec::with_capacity(table.header.len());
    for col in &table.header {
        match mapping.resolve(col) {
            Some(field) if !slots.contains(&Some(field)) => {
                slots.push( Some(field));
                columns.push( field.to_string());
            }
            _ => {
                slots.push( None);
                columns.push( col.clone());
            }
        }
    }

    let missing: Vec<String> = CanonicalField::mandatory_fields()
        .filter( |f| !slots.contains(&Some(*f)))
        .map( |f| f.to_string())
        .collect();
    if !missing.is_empty() {
        return Err( OdinFiremapError::MissingColumns(missing))
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (i,row) in table.rows.iter().enumerate() {
        if row.len() != slots.len() {
            return Err( malformed_input!("row {} has {} cells, header has {}", i+1, row.len(), slots.len()))
        }

        let mut rec = CanonicalRecord::default();
        for ((slot, col), value) in slots.iter().zip( table.header.iter()).zip( row.iter()) {
            match slot {
                Some(field) => rec.set( *field, value),
                None => { rec.extra.insert( col.clone(), value.clone()); }
            }
        }
        records.push(rec);
    }

    Ok( CanonicalTable { columns, records } )
}
