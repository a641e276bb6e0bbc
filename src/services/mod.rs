pub mod confinement;
pub mod heartbeat;
