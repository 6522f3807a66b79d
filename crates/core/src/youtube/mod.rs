//! Channel search and video listing against the video platform.

mod data_api;
mod types;

pub use data_api::YouTubeDataApi;
pub use types::{ChannelMatch, PlatformError, VideoPlatform};
