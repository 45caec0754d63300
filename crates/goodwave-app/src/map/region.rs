use goodwave_core::Coordinate;

/// Extents are padded by this factor so edge pins are not flush with the border.
const PADDING: f64 = 1.3;
/// Smallest span in degrees, so a single pin or a tight cluster keeps context.
const MIN_SPAN_DEGREES: f64 = 20.0;
const MAX_LATITUDE_SPAN: f64 = 180.0;
const MAX_LONGITUDE_SPAN: f64 = 360.0;
const WORLD_SPAN_DEGREES: f64 = 100.0;

/// Visible map area: a center and the degrees shown along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl Default for MapRegion {
    fn default() -> Self {
        Self::world()
    }
}

impl MapRegion {
    /// The region shown before anything has been geocoded.
    #[must_use]
    pub fn world() -> Self {
        Self {
            center: Coordinate::new(0.0, 0.0),
            latitude_span: WORLD_SPAN_DEGREES,
            longitude_span: WORLD_SPAN_DEGREES,
        }
    }

    /// Smallest padded region bounding every coordinate, or `None` if there
    /// are none.
    ///
    /// The center is the midpoint of the bounding box. Each span is the
    /// padded extent, floored at 20 degrees and capped at the globe.
    #[must_use]
    pub fn fit<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);

        for c in iter {
            min_lat = min_lat.min(c.latitude);
            max_lat = max_lat.max(c.latitude);
            min_lon = min_lon.min(c.longitude);
            max_lon = max_lon.max(c.longitude);
        }

        Some(Self {
            center: Coordinate::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0),
            latitude_span: span(max_lat - min_lat, MAX_LATITUDE_SPAN),
            longitude_span: span(max_lon - min_lon, MAX_LONGITUDE_SPAN),
        })
    }

    #[must_use]
    pub fn contains(&self, c: &Coordinate) -> bool {
        (c.latitude - self.center.latitude).abs() <= self.latitude_span / 2.0
            && (c.longitude - self.center.longitude).abs() <= self.longitude_span / 2.0
    }
}

fn span(extent: f64, cap: f64) -> f64 {
    (extent * PADDING).max(MIN_SPAN_DEGREES).min(cap)
}
