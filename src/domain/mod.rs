//! Domain layer: error taxonomy, access policy, and the persistence gateway
//! contract. No framework types beyond the ORM error conversion.

pub mod errors;
pub mod policy;
pub mod repositories;

pub use errors::DomainError;
pub use policy::{AccessPolicy, Caller, Role, RolePolicy};
pub use repositories::{
    CreateItemInput, ItemRepository, LoanFilter, LoanRepository, SubmitLoanInput, UpdateItemInput,
};
