pub mod character;
pub mod era;
pub mod location;
pub mod phrase;
pub mod turn;
