pub mod action;
pub mod bases;
pub mod count;
pub mod outcome;
pub mod record;
