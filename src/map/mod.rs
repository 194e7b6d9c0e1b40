mod feature_state;
mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use feature_state::{FeatureId, FeatureState, FeatureStateStore};
pub use geometry::point_in_rings;
pub use projection::Viewport;
pub use renderer::{FillPaint, LinePaint, MapLayers, MapRenderer, RegionPaint};
pub use spatial::RegionIndex;
