pub mod gateway;
pub mod tiles;

pub use gateway::GatewayWorker;
pub use tiles::TileCache;
