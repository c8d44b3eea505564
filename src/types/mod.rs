pub mod coordinates;
pub mod forecast;
pub mod month;
pub mod observation;
