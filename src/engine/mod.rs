pub mod attempt;
pub mod clock;
pub mod cursor;
pub mod ledger;
