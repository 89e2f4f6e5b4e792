pub mod cli;
pub mod meraki;
