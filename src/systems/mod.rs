pub mod export;
pub mod input;
pub mod landmass;
