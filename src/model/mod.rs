pub mod board;
pub mod defaults;
pub mod epic;
pub mod sprint;

pub use board::{Board, EpicCommand, EpicStore};
pub use epic::{Epic, EpicPatch};
pub use sprint::Sprint;
