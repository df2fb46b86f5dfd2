pub mod doctor;
pub mod run;
pub mod scores;
pub mod validate;
pub mod weights;
