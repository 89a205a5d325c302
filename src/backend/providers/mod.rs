pub mod horizon;
pub mod local;

pub use horizon::HorizonBackend;
pub use local::LocalBackend;
