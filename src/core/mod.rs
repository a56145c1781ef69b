pub mod catalog;
pub mod characters;
pub mod era;
pub mod locations;
pub mod phrasebook;
pub mod policy;
pub mod rules;
pub mod session;
