//! Venue Catalog
//!
//! Reference data the chat assistant recommends from. The catalog is loaded
//! from a JSON array and embedded, in reduced form, in the chat system
//! instruction.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{AssistError, Result};

/// A single venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub venue_type: String,
    pub partner: bool,
    pub address: String,
    pub short_description: String,
    pub rating: f32,
    /// Every other attribute (images, offers, hours, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk shape; ids may be strings, numbers or absent
#[derive(Deserialize)]
struct RawVenue {
    #[serde(default)]
    id: Option<Value>,
    name: String,
    #[serde(default, rename = "type")]
    venue_type: String,
    #[serde(default, alias = "partener")]
    partner: bool,
    #[serde(default)]
    address: String,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    rating: f32,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Fields sent to the model for reference
#[derive(Serialize)]
struct VenueReference<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    venue_type: &'a str,
    partner: bool,
    address: &'a str,
    short_description: &'a str,
    rating: f32,
}

impl Venue {
    /// Id given in the file, trimmed; `None` when absent or blank
    fn explicit_id(raw: &RawVenue) -> Option<String> {
        match &raw.id {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn from_raw(raw: RawVenue, id: String) -> Self {
        Self {
            id,
            name: raw.name,
            venue_type: raw.venue_type,
            partner: raw.partner,
            address: raw.address,
            short_description: raw.short_description,
            rating: raw.rating,
            extra: raw.extra,
        }
    }

    fn reference(&self) -> VenueReference<'_> {
        VenueReference {
            id: &self.id,
            name: &self.name,
            venue_type: &self.venue_type,
            partner: self.partner,
            address: &self.address,
            short_description: &self.short_description,
            rating: self.rating,
        }
    }

    /// JSON description used for summaries: everything except images and offers
    pub fn summary_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("image_url");
            map.remove("offers");
        }
        Ok(serde_json::to_string(&value)?)
    }
}

/// Ordered, id-indexed collection of venues
#[derive(Debug, Clone, Default)]
pub struct VenueCatalog {
    venues: Vec<Venue>,
    index: HashMap<String, usize>,
}

impl VenueCatalog {
    pub fn new(venues: Vec<Venue>) -> Self {
        let index = venues
            .iter()
            .enumerate()
            .map(|(i, venue)| (venue.id.clone(), i))
            .collect();
        Self { venues, index }
    }

    /// Parse a JSON array of venues
    ///
    /// A venue without an id takes its position in the list, or the next
    /// free number when that position is already used as an explicit id.
    /// Repeated explicit ids reject the catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawVenue> = serde_json::from_str(json)
            .map_err(|e| AssistError::Catalog(format!("invalid venue list: {}", e)))?;
        let explicit: Vec<Option<String>> = raw.iter().map(Venue::explicit_id).collect();

        let mut taken = HashSet::new();
        if let Some(dup) = explicit.iter().flatten().find(|id| !taken.insert(id.as_str())) {
            return Err(AssistError::Catalog(format!("duplicate venue id: {}", dup)));
        }
        let mut taken: HashSet<String> = taken.into_iter().map(str::to_string).collect();

        let mut venues = Vec::with_capacity(raw.len());
        for (index, (raw, id)) in raw.into_iter().zip(explicit.iter()).enumerate() {
            let id = match id {
                Some(id) => id.clone(),
                None => {
                    let mut n = index;
                    while taken.contains(&n.to_string()) {
                        n += 1;
                    }
                    let id = n.to_string();
                    taken.insert(id.clone());
                    id
                }
            };
            venues.push(Venue::from_raw(raw, id));
        }

        debug!(venues = venues.len(), "Venue catalog parsed");
        Ok(Self::new(venues))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            AssistError::Catalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Venue> {
        self.index.get(id.trim()).map(|&i| &self.venues[i])
    }

    /// Look up `ids` in order, skipping unknown and repeated ids
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Venue> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter_map(|id| self.get(id.as_ref()))
            .filter(|venue| seen.insert(venue.id.as_str()))
            .collect()
    }

    /// Pretty JSON of the core fields of every venue
    pub fn reference_snapshot(&self) -> Result<String> {
        let references: Vec<_> = self.venues.iter().map(Venue::reference).collect();
        Ok(serde_json::to_string_pretty(&references)?)
    }
}
