pub mod agent;
pub mod gateway;
pub mod plugins;
