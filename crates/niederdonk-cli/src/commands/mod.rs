pub mod portfolio;
pub mod pro_forma;
pub mod scenarios;
