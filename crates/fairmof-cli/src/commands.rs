pub mod export;
pub mod extract;
pub mod inspect;
