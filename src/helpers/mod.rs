pub mod duration;
pub mod export;
pub mod fs;
pub mod pdf;
pub mod period;
