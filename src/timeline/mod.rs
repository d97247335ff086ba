//! Timeline coordinate engine: calendar grid, date ↔ pixel mapping, bar
//! geometry, pointer gestures and scroll-to-today. Free of egui painting so it
//! can be exercised without a window.

pub mod autoscroll;
pub mod calendar;
pub mod geometry;
pub mod granularity;
pub mod grid;
pub mod interaction;
pub mod mapper;
pub mod rows;
pub mod view;

pub use geometry::BarView;
pub use granularity::Granularity;
pub use grid::ColumnHeader;
pub use interaction::{Edge, Pointer};
pub use mapper::InverseMapping;
pub use view::TimelineView;
