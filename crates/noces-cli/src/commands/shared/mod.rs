pub mod clients;
pub mod limit;
pub mod parse;
pub mod responses;
pub mod signers;
