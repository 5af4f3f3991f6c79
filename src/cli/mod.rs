pub mod convert;
pub mod currencies;
pub mod history;
pub mod rate;
pub mod setup;
pub mod ui;
