//! Identifiers of rows owned by the host application.
//!
//! The engine keys its own rows by `Uuid`; actors, plants, departments, roles and
//! governed entity records are referenced by the integer keys the host assigns.

pub type ActorId = i64;
pub type PlantId = i64;
pub type DepartmentId = i64;
pub type RoleId = i64;
pub type RecordId = i64;
pub type ApplicationId = i64;
