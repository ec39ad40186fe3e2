pub mod aggregate;
pub mod catalog;
pub mod leverage;
pub mod masterplan;
pub mod selection;
