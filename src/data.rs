//! Map data as returned by the external APIs. Elements are materialized once
//! per fetch response and only ever read afterwards.

pub mod nominatim;
pub mod osm;
