pub mod consts;
pub mod dcp;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
