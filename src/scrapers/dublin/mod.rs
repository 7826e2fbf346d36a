pub mod hugh_lane_gallery;
pub mod whelans;
