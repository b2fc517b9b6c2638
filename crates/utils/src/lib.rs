pub mod assets;
pub mod decade;
pub mod logging;
pub mod response;
