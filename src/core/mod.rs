pub mod geometry;
pub mod ledger;
pub mod model;
pub mod retry;
pub mod segmenter;
pub mod token;
