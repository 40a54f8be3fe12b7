pub mod badges;
pub mod cmds;
pub mod conductors;
mod constructors;
pub mod entities;
pub mod format;
pub mod handlers;
pub mod interactors;
pub mod repositories;
pub mod revalidate;
pub mod usecases;
pub(crate) mod utils;

pub use constructors::*;
