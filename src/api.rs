pub mod interface;
pub mod server;

pub use interface::{DraftAPI, DynAPI, FavoritesAPI, LocationAPI, API};
pub use server::serve;
