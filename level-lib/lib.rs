pub mod command;
pub mod field;
pub mod grid;
pub mod grid_layout;
pub mod model;
pub mod notation;
pub mod session;
pub mod store;
pub mod table;

pub use field::Field;
pub use model::{
  GlobalConfig,
  LevelConfig,
};
pub use session::Session;
pub use store::LevelStore;
