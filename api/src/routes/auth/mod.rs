//! Role-specific login endpoints.
//!
//! Each dashboard has its own login URL; a credential for another role is
//! rejected exactly like a wrong password.

pub mod post;

pub use post::{company_admin_login, super_admin_login, trainer_login};
