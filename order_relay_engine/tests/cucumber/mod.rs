mod relay_world;
mod steps;

pub use relay_world::RelayWorld;
