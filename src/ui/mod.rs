pub mod controls;
pub mod epic_sidebar;
pub mod theme;
pub mod timeline_canvas;
