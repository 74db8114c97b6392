//! Textbook supplier and class information administration.
//!
//! Both entities share one generic operation set ([`domain::AdminService`]); every query they
//! issue is scoped by the caller's data permission.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod dto;
pub mod infra;
pub mod module;

pub use config::{DataPermissionConfig, EduAdminConfig};
pub use domain::{AdminService, ClassInfoService, DomainError, SupplierService};
pub use infra::storage::entity::{em_class_info, em_textbook_sup};
pub use module::EduAdmin;
