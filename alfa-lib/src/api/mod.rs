//! API operations

mod insurers;

pub use insurers::InsurerService;
