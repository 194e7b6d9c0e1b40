/// Name tooltip anchored to a geographic position
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Popup {
    lon: f64,
    lat: f64,
    text: String,
}

impl Popup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_lng_lat(&mut self, lon: f64, lat: f64) -> &mut Self {
        self.lon = lon;
        self.lat = lat;
        self
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
        self
    }

    pub fn lng_lat(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
