pub mod cache;
pub mod error;
pub mod params;
pub mod race;
pub mod session;
pub mod standings;
pub mod widget;
