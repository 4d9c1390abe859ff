use crate::errors::{Error, Result};

/// A geographic rectangle.
///
/// Bounding boxes are formatted differently by different services: Overpass
/// clauses order them south,west,north,east while other sources hand out
/// left,bottom,right,top arrays. Internally this type is the single canonical
/// form (named south/west/north/east fields); conversions happen only at
/// named constructors and accessors.
///
/// The `*0` fields snapshot the values the box was created with. Cropping is
/// always recomputed from that snapshot, so repeated crops do not compound.
#[derive(Debug, Clone, Default)]
pub struct BBox {
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,

    south0: Option<f64>,
    west0: Option<f64>,
    north0: Option<f64>,
    east0: Option<f64>,
    width0: Option<f64>,
    height0: Option<f64>,
}

impl BBox {
    /// Build from the canonical field order. Non-finite input or an inverted
    /// box (south >= north, west >= east) is a data error, not corrected.
    pub fn from_min_max(south: f64, west: f64, north: f64, east: f64) -> Result<BBox> {
        for value in [south, west, north, east] {
            if !value.is_finite() {
                return Err(Error::validation("bounding box values must be finite"));
            }
        }
        if south >= north || west >= east {
            return Err(Error::validation(
                "bounding box requires south < north and west < east",
            ));
        }

        let mut bbox = BBox {
            south: Some(south),
            west: Some(west),
            north: Some(north),
            east: Some(east),
            ..BBox::default()
        };
        bbox.snapshot_original()?;
        Ok(bbox)
    }

    /// Build from a cached-file array, which uses the same canonical order.
    pub fn from_array(values: [f64; 4]) -> Result<BBox> {
        let [south, west, north, east] = values;
        BBox::from_min_max(south, west, north, east)
    }

    fn snapshot_original(&mut self) -> Result<()> {
        self.south0 = self.south;
        self.west0 = self.west;
        self.north0 = self.north;
        self.east0 = self.east;
        self.width0 = Some(self.width()?);
        self.height0 = Some(self.height()?);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        [
            self.south,
            self.west,
            self.north,
            self.east,
            self.south0,
            self.west0,
            self.north0,
            self.east0,
            self.width0,
            self.height0,
        ]
        .iter()
        .all(|field| matches!(field, Some(value) if value.is_finite()))
    }

    pub fn width(&self) -> Result<f64> {
        match (self.west, self.east) {
            (Some(west), Some(east)) => Ok((east - west).abs()),
            _ => Err(Error::not_ready("bounding box is not initialized")),
        }
    }

    pub fn height(&self) -> Result<f64> {
        match (self.south, self.north) {
            (Some(south), Some(north)) => Ok((north - south).abs()),
            _ => Err(Error::not_ready("bounding box is not initialized")),
        }
    }

    /// Crop (or re-crop) to match the output surface's aspect ratio. The
    /// wider dimension shrinks, centered on the original box; the other is
    /// untouched. Works from the original snapshot, so calling this twice
    /// with the same target gives the same box as calling it once.
    pub fn crop_to_aspect(&mut self, target_width: f64, target_height: f64) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::not_ready("bounding box is not ready to crop"));
        }
        let (width0, height0) = (self.width0.unwrap(), self.height0.unwrap());
        let (south0, west0) = (self.south0.unwrap(), self.west0.unwrap());
        let (north0, east0) = (self.north0.unwrap(), self.east0.unwrap());

        // Map the original width onto the target width to test the height.
        let test_height = width0 * target_height / target_width;
        if test_height < target_height {
            // Box is wider than the target aspect: crop left and right.
            let new_width = height0 * target_width / target_height;
            let center = (west0 + east0) / 2.0;
            self.west = Some(center - new_width / 2.0);
            self.east = Some(center + new_width / 2.0);
        } else {
            // Box is taller than the target aspect: crop top and bottom.
            let new_height = width0 * target_height / target_width;
            let center = (south0 + north0) / 2.0;
            self.south = Some(center - new_height / 2.0);
            self.north = Some(center + new_height / 2.0);
        }
        Ok(())
    }

    /// Canonical array form, same ordering as the Overpass clause.
    pub fn to_array(&self) -> Result<[f64; 4]> {
        match (self.south, self.west, self.north, self.east) {
            (Some(south), Some(west), Some(north), Some(east)) => {
                Ok([south, west, north, east])
            }
            _ => Err(Error::not_ready("bounding box is not initialized")),
        }
    }

    /// Bounding box clause text for Overpass QL. Per the language guide,
    /// clauses start with the lowest latitude, then lowest longitude, then
    /// highest latitude, then highest longitude.
    pub fn overpass_bbox(&self) -> Result<String> {
        let [south, west, north, east] = self.to_array()?;
        Ok(format!("{},{},{},{}", south, west, north, east))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn rejects_non_finite_values() {
        let err = BBox::from_min_max(f64::NAN, -78.9, 36.0, -78.8).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn rejects_inverted_boxes() {
        assert!(BBox::from_min_max(36.0, -78.9, 35.9, -78.8).is_err());
        assert!(BBox::from_min_max(35.9, -78.8, 36.0, -78.9).is_err());
    }

    #[test]
    fn width_and_height() {
        let bbox = BBox::from_min_max(35.9857, -78.9154, 36.0076, -78.8882).unwrap();
        assert!((bbox.width().unwrap() - 0.0272).abs() < 1e-9);
        assert!((bbox.height().unwrap() - 0.0219).abs() < 1e-9);
    }

    #[test]
    fn uninitialized_box_reports_not_ready() {
        let bbox = BBox::default();
        assert!(!bbox.is_valid());
        assert_eq!(bbox.width().unwrap_err().kind, ErrorKind::NotReady);
        assert_eq!(bbox.overpass_bbox().unwrap_err().kind, ErrorKind::NotReady);
    }

    #[test]
    fn overpass_clause_order_is_south_west_north_east() {
        let bbox = BBox::from_min_max(35.9857, -78.9154, 36.0076, -78.8882).unwrap();
        assert_eq!(bbox.overpass_bbox().unwrap(), "35.9857,-78.9154,36.0076,-78.8882");
    }

    #[test]
    fn crop_is_idempotent() {
        let mut bbox = BBox::from_min_max(35.0, -79.0, 36.0, -77.0).unwrap();
        bbox.crop_to_aspect(800.0, 800.0).unwrap();
        let first = bbox.to_array().unwrap();
        bbox.crop_to_aspect(800.0, 800.0).unwrap();
        assert_eq!(first, bbox.to_array().unwrap());
    }

    #[test]
    fn crop_shrinks_wider_dimension_around_center() {
        // Two degrees wide, one degree tall, square target: longitude span
        // shrinks to one degree centered on -78.
        let mut bbox = BBox::from_min_max(35.0, -79.0, 36.0, -77.0).unwrap();
        bbox.crop_to_aspect(800.0, 800.0).unwrap();
        assert!((bbox.west.unwrap() - -78.5).abs() < 1e-9);
        assert!((bbox.east.unwrap() - -77.5).abs() < 1e-9);
        assert_eq!(bbox.south, Some(35.0));
        assert_eq!(bbox.north, Some(36.0));
    }
}
