pub mod access;
pub mod approval;
pub mod audit;
pub mod db_init;
pub mod entity;
pub mod permission;
pub mod workflow;
