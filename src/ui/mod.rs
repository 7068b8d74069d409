pub mod app;
pub mod components;
pub mod composer;
pub mod state;

pub use app::BoardApp;
pub use composer::Composer;
pub use state::{BoardState, Interaction};
