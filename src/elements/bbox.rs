use crate::utils::coordinate_as_float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bbox {
    pub min_lon: i32,
    pub min_lat: i32,
    pub max_lon: i32,
    pub max_lat: i32,
}

impl Bbox {
    pub fn new(min_lon: i32, min_lat: i32, max_lon: i32, max_lat: i32) -> Bbox {
        Bbox {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    pub fn empty() -> Bbox {
        Bbox::new(1800000000, 900000000, -1800000000, -900000000)
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn expand(&mut self, lon: i32, lat: i32) {
        if lon < self.min_lon {
            self.min_lon = lon;
        }
        if lon > self.max_lon {
            self.max_lon = lon;
        }
        if lat < self.min_lat {
            self.min_lat = lat;
        }
        if lat > self.max_lat {
            self.max_lat = lat;
        }
    }

    pub fn contains(&self, lon: i32, lat: i32) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    pub fn width(&self) -> f64 {
        coordinate_as_float(self.max_lon) - coordinate_as_float(self.min_lon)
    }

    pub fn height(&self) -> f64 {
        coordinate_as_float(self.max_lat) - coordinate_as_float(self.min_lat)
    }
}
